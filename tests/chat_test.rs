mod common;

use common::ScriptedModel;
use interviewer::chat::run_interview_chat;
use interviewer::constants::CLOSING_MESSAGE;
use serde_json::json;
use std::io::Cursor;
use tempfile::TempDir;

#[tokio::test]
async fn test_chat_runs_to_completion_and_writes_chart() {
    let temp_dir = TempDir::new().unwrap();
    let chart_path = temp_dir.path().join("chart.svg");
    let model = ScriptedModel::new()
        .then_extract(json!({ "full_name": "Alex Kim" }))
        .then_extract(json!({
            "school_background": [4, 8, 6],
            "working_experience": [3, 7, 5],
            "interview_motivation": 9,
        }));
    let input = Cursor::new("My name is Alex Kim\n\nMSc, senior engineer, motivation 9\nignored\n");
    let mut output = Vec::new();

    let summary = run_interview_chat(&model, input, &mut output, Some(chart_path.as_path()))
        .await
        .unwrap();

    let printed = String::from_utf8(output).unwrap();
    assert!(printed.contains("assistant: Question 1?"));
    assert!(printed.contains("assistant: Question 2?"));
    assert!(printed.contains(CLOSING_MESSAGE));
    assert!(printed.contains("For Recruiter Only:"));
    assert!(printed.contains("Motivation"));
    assert!(summary.details.is_complete());
    // The blank line is skipped and the trailing line is never read as an answer.
    assert_eq!(model.extracted_passages().len(), 2);

    let svg = std::fs::read_to_string(&chart_path).unwrap();
    assert!(svg.starts_with("<svg"));
}

#[tokio::test]
async fn test_chat_stops_at_end_of_input() {
    let model = ScriptedModel::new().then_extract(json!({ "full_name": "Alex" }));
    let input = Cursor::new("My name is Alex\n");
    let mut output = Vec::new();

    let summary = run_interview_chat(&model, input, &mut output, None)
        .await
        .unwrap();

    assert_eq!(summary.details.full_name.as_deref(), Some("Alex"));
    assert!(!summary.details.is_complete());
    assert!(summary.chart.is_none());
}

#[tokio::test]
async fn test_chat_surfaces_model_failure() {
    let model = ScriptedModel::new().then_fail_extract("boom");
    let input = Cursor::new("My name is Alex\n");
    let mut output = Vec::new();

    let result = run_interview_chat(&model, input, &mut output, None).await;
    assert!(result.is_err());
}
