use std::f64::consts::PI;

use crate::details::{PersonalDetails, ScoreTriple};

pub const CHART_TITLE: &str = "Candidate's Job Match";
pub const RANGE_MAX: f64 = 10.0;

pub const AXIS_LABELS: [&str; 7] = [
    "Motivation",
    "Highest Degree",
    "Academic Major",
    "College Ranking",
    "Job Level",
    "Job Position",
    "Company Ranking",
];

const SIZE: f64 = 480.0;
const CENTER_X: f64 = SIZE / 2.0;
const CENTER_Y: f64 = SIZE / 2.0 + 15.0;
const RADIUS: f64 = 160.0;
const GRID_STEPS: u32 = 5;
const LINE_COLOR: &str = "#f0f921";

/// Seven-axis radar chart of a completed profile, on a fixed 0-10 scale.
#[derive(Debug, Clone, PartialEq)]
pub struct RadarChart {
    values: [f64; 7],
}

impl RadarChart {
    pub fn new(motivation: u8, education: ScoreTriple, career: ScoreTriple) -> Self {
        let mut values = [0.0; 7];
        let scores = std::iter::once(u32::from(motivation))
            .chain(education)
            .chain(career);
        for (slot, score) in values.iter_mut().zip(scores) {
            *slot = f64::from(score).clamp(0.0, RANGE_MAX);
        }
        Self { values }
    }

    /// `None` until every charted field is known.
    pub fn from_details(details: &PersonalDetails) -> Option<Self> {
        Some(Self::new(
            details.interview_motivation?,
            details.school_background?,
            details.working_experience?,
        ))
    }

    pub fn values(&self) -> &[f64; 7] {
        &self.values
    }

    /// Label and value per axis, in plotting order.
    pub fn axes(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        AXIS_LABELS.iter().copied().zip(self.values.iter().copied())
    }

    fn angle(index: usize) -> f64 {
        -PI / 2.0 + 2.0 * PI * index as f64 / AXIS_LABELS.len() as f64
    }

    fn point(index: usize, value: f64) -> (f64, f64) {
        let r = RADIUS * value / RANGE_MAX;
        let angle = Self::angle(index);
        (CENTER_X + r * angle.cos(), CENTER_Y + r * angle.sin())
    }

    /// Vertices of the data polygon, one per axis.
    pub fn vertices(&self) -> Vec<(f64, f64)> {
        self.values
            .iter()
            .enumerate()
            .map(|(i, v)| Self::point(i, *v))
            .collect()
    }

    fn polygon_points(points: impl IntoIterator<Item = (f64, f64)>) -> String {
        points
            .into_iter()
            .map(|(x, y)| format!("{:.2},{:.2}", x, y))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Render as a standalone SVG document.
    pub fn render_svg(&self) -> String {
        let n = AXIS_LABELS.len();
        let mut lines = vec![
            format!(
                r##"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"##,
                size = SIZE
            ),
            r##"<rect width="100%" height="100%" fill="#111111"/>"##.to_string(),
            format!(
                r##"<text x="20" y="30" fill="#f2f5fa" font-family="sans-serif" font-size="17">{}</text>"##,
                CHART_TITLE
            ),
        ];

        for step in 1..=GRID_STEPS {
            let level = RANGE_MAX * f64::from(step) / f64::from(GRID_STEPS);
            let ring = Self::polygon_points((0..n).map(|i| Self::point(i, level)));
            lines.push(format!(
                r##"<polygon class="grid" points="{}" fill="none" stroke="#506784" stroke-width="1"/>"##,
                ring
            ));
        }

        for (i, label) in AXIS_LABELS.iter().enumerate() {
            let (x, y) = Self::point(i, RANGE_MAX);
            lines.push(format!(
                r##"<line class="axis" x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="#506784" stroke-width="1"/>"##,
                CENTER_X, CENTER_Y, x, y
            ));
            let (lx, ly) = Self::point(i, RANGE_MAX * 1.15);
            let anchor = if (lx - CENTER_X).abs() < 1.0 {
                "middle"
            } else if lx > CENTER_X {
                "start"
            } else {
                "end"
            };
            lines.push(format!(
                r##"<text x="{:.2}" y="{:.2}" fill="#f2f5fa" font-family="sans-serif" font-size="12" text-anchor="{}">{}</text>"##,
                lx, ly, anchor, label
            ));
        }

        lines.push(format!(
            r##"<polygon class="data" points="{}" fill="{color}" fill-opacity="0.15" stroke="{color}" stroke-width="2"/>"##,
            Self::polygon_points(self.vertices()),
            color = LINE_COLOR
        ));
        for (x, y) in self.vertices() {
            lines.push(format!(
                r##"<circle cx="{:.2}" cy="{:.2}" r="3" fill="{}"/>"##,
                x, y, LINE_COLOR
            ));
        }

        lines.push("</svg>".to_string());
        let mut svg = lines.join("\n");
        svg.push('\n');
        svg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_values_follow_axis_order() {
        let chart = RadarChart::new(9, [1, 2, 3], [4, 5, 6]);
        assert_eq!(chart.values(), &[9.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let labels: Vec<_> = chart.axes().map(|(label, _)| label).collect();
        assert_eq!(labels, AXIS_LABELS.to_vec());
    }

    #[test]
    fn test_values_are_clamped_to_range() {
        let chart = RadarChart::new(200, [11, 0, 10], [0, 0, 0]);
        assert_eq!(chart.values()[0], RANGE_MAX);
        assert_eq!(chart.values()[1], RANGE_MAX);
        assert_eq!(chart.values()[2], 0.0);
    }

    #[test]
    fn test_large_rankings_are_clamped_for_display() {
        let details = PersonalDetails {
            full_name: Some("Alex".to_string()),
            school_background: Some([3, 8, 25]),
            working_experience: Some([2, 5, 140]),
            interview_motivation: Some(6),
        };
        let chart = RadarChart::from_details(&details).unwrap();
        assert_eq!(chart.values(), &[6.0, 3.0, 8.0, RANGE_MAX, 2.0, 5.0, RANGE_MAX]);
        assert_eq!(details.school_background, Some([3, 8, 25]));
    }

    #[test]
    fn test_from_details_requires_all_scores() {
        let mut details = PersonalDetails {
            full_name: Some("Alex".to_string()),
            school_background: Some([4, 8, 6]),
            working_experience: Some([3, 7, 5]),
            interview_motivation: None,
        };
        assert!(RadarChart::from_details(&details).is_none());

        details.interview_motivation = Some(8);
        let chart = RadarChart::from_details(&details).unwrap();
        assert_eq!(chart.values()[0], 8.0);
    }

    #[test]
    fn test_first_axis_points_up() {
        let chart = RadarChart::new(10, [0, 0, 0], [0, 0, 0]);
        let (x, y) = chart.vertices()[0];
        assert!(approx(x, CENTER_X));
        assert!(approx(y, CENTER_Y - RADIUS));
        let (x, y) = chart.vertices()[1];
        assert!(approx(x, CENTER_X));
        assert!(approx(y, CENTER_Y));
    }

    #[test]
    fn test_svg_has_closed_data_polygon_and_labels() {
        let svg = RadarChart::new(7, [4, 8, 6], [3, 7, 5]).render_svg();
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains(CHART_TITLE));
        assert_eq!(svg.matches(r#"class="data""#).count(), 1);
        assert_eq!(svg.matches(r#"class="grid""#).count(), GRID_STEPS as usize);
        assert_eq!(svg.matches(r#"class="axis""#).count(), AXIS_LABELS.len());
        for label in AXIS_LABELS {
            assert!(svg.contains(label), "missing label {}", label);
        }
    }
}
