use tracing::{debug, info, instrument};

use crate::constants::CLOSING_MESSAGE;
use crate::details::Field;
use crate::llm::{LanguageModel, LlmError};

/// Build the recruiter prompt for the given missing fields.
pub fn question_prompt(ask_for: &[Field]) -> String {
    let ask_for_list = ask_for
        .iter()
        .map(|field| format!("'{}'", field.name()))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are a job recruiter who only asks questions.\n\
        What you are asking for are all and should only be in the \"ask_for\" list.\n\
        After you pick up an item in the \"ask_for\" list, extend it with about 20 more words \
        in your question with more thoughts and guidance.\n\
        You should only ask one question at a time even if you don't get all according to the ask_for list.\n\
        Don't ask as a list!\n\
        Wait for the user's answer after each question. Don't make up answers.\n\
        If the ask_for list is empty then thank them and ask how you can help them.\n\
        Don't greet or say hi.\n\
        ### ask_for list: [{}]\n",
        ask_for_list
    )
}

/// Produce the next interview question, or the closing message once nothing
/// is missing.
#[instrument(skip(model))]
pub async fn ask_for_info(model: &dyn LanguageModel, ask_for: &[Field]) -> Result<String, LlmError> {
    if ask_for.is_empty() {
        info!("No fields missing, sending closing message");
        return Ok(CLOSING_MESSAGE.to_string());
    }

    let prompt = question_prompt(ask_for);
    debug!(?prompt, "Constructed question prompt");

    let question = model.complete(&prompt).await?;
    Ok(question.trim().to_string())
}
