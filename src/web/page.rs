//! HTML rendering for the prediction dashboard

use crate::types::outcome::Prediction;
use crate::types::record::{Gender, InputRecord, Rating, YesNo};
use std::fmt::Write;

const STYLE: &str = r#"
body { background-color: #f9f9f9; font-family: 'Arial', sans-serif; color: #333333; margin: 0; display: flex; }
aside { background-color: #ffffff; width: 22rem; padding: 1.5rem; min-height: 100vh; box-shadow: 1px 0 4px rgba(0,0,0,0.08); }
main { flex: 1; padding: 2rem 3rem; }
h1, h2, h3 { color: #3E6C63; }
label { display: block; margin-top: 0.8rem; font-weight: bold; }
input, select { width: 100%; margin-top: 0.3rem; }
button { background-color: #3E6C63; color: white; border: none; border-radius: 5px; font-weight: bold; padding: 0.6rem 1.2rem; margin-top: 1.2rem; cursor: pointer; }
button:hover { background-color: #4B8F72; }
.error { color: #a32020; font-weight: bold; }
.result { font-size: 1.1rem; }
"#;

/// Escape text for inclusion in HTML content or attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render the full page: input form, inputs summary, and optionally a
/// prediction result or a validation error.
pub fn render(record: &InputRecord, prediction: Option<&Prediction>, error: Option<&str>) -> String {
    let mut html = String::with_capacity(8 * 1024);

    let _ = write!(
        html,
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <title>Depression Prediction App</title><style>{}</style></head><body>",
        STYLE
    );

    html.push_str("<aside><h2>User Input</h2><form method=\"post\" action=\"/predict\" id=\"prediction-form\">");
    render_inputs(&mut html, record);
    html.push_str("</form>");
    render_summary(&mut html, record);
    html.push_str("</aside>");

    html.push_str(
        "<main><h1>&#129504; Depression Prediction Dashboard</h1>\
         <p>This app predicts the likelihood of depression based on various factors such as \
         gender, age, academic pressure, and more. Fill in the details to get the prediction.</p><hr>\
         <button type=\"submit\" form=\"prediction-form\">&#128302; Predict Depression Likelihood</button>",
    );

    if let Some(error) = error {
        let _ = write!(html, "<p class=\"error\">{}</p>", escape(error));
    }

    if let Some(prediction) = prediction {
        let _ = write!(
            html,
            "<h3>Prediction Result:</h3><p class=\"result\" data-label=\"{}\">{}</p>",
            prediction.label.class(),
            escape(prediction.message())
        );
    }

    html.push_str(
        "<hr><h3>Need help?</h3>\
         <p>If you're feeling depressed or in need of help, please contact a healthcare \
         professional or reach out to a helpline.</p>\
         <ul><li><strong>National Helpline:</strong> contact your local national helpline</li>\
         <li><strong>Mental Health Resources:</strong> ask a healthcare professional for local mental health resources</li></ul>\
         </main></body></html>",
    );

    html
}

fn render_inputs(html: &mut String, record: &InputRecord) {
    select(
        html,
        "gender",
        "Gender",
        &[Gender::Male.label(), Gender::Female.label()],
        record.gender.label(),
    );
    number(html, "age", "Age", &record.age.to_string(), "1", Some("100"), "1");
    slider(html, "academic_pressure", "Academic Pressure (1-5)", record.academic_pressure);
    slider(html, "study_satisfaction", "Study Satisfaction (1-5)", record.study_satisfaction);
    number(
        html,
        "sleep_duration",
        "Sleep Duration (hours)",
        &format!("{:?}", record.sleep_duration),
        "0",
        None,
        "any",
    );
    slider(html, "dietary_habits", "Dietary Habits (1-5)", record.dietary_habits);
    radio(
        html,
        "suicidal_thoughts",
        "Have you ever had suicidal thoughts?",
        record.suicidal_thoughts,
    );
    number(html, "study_hours", "Study Hours", &record.study_hours.to_string(), "0", None, "1");
    slider(html, "financial_stress", "Financial Stress (1-5)", record.financial_stress);
    select(
        html,
        "family_history",
        "Family History of Mental Illness",
        &[YesNo::No.label(), YesNo::Yes.label()],
        record.family_history.label(),
    );
}

fn render_summary(html: &mut String, record: &InputRecord) {
    html.push_str("<h3>Your Inputs Summary:</h3><ul class=\"summary\">");
    for (name, value) in record.summary() {
        let _ = write!(html, "<li><strong>{}:</strong> {}</li>", name, escape(&value));
    }
    html.push_str("</ul>");
}

fn select(html: &mut String, name: &str, label: &str, options: &[&str], selected: &str) {
    let _ = write!(html, "<label for=\"{name}\">{label}</label><select id=\"{name}\" name=\"{name}\">");
    for option in options {
        let marker = if *option == selected { " selected" } else { "" };
        let _ = write!(html, "<option value=\"{option}\"{marker}>{option}</option>");
    }
    html.push_str("</select>");
}

fn radio(html: &mut String, name: &str, label: &str, value: YesNo) {
    let _ = write!(html, "<label>{label}</label>");
    for option in [YesNo::No, YesNo::Yes] {
        let checked = if option == value { " checked" } else { "" };
        let _ = write!(
            html,
            "<span><input type=\"radio\" name=\"{name}\" value=\"{0}\"{checked}> {0}</span> ",
            option.label()
        );
    }
}

fn slider(html: &mut String, name: &str, label: &str, value: Rating) {
    let _ = write!(
        html,
        "<label for=\"{name}\">{label}</label>\
         <input type=\"range\" id=\"{name}\" name=\"{name}\" min=\"{}\" max=\"{}\" step=\"1\" value=\"{}\">",
        Rating::MIN,
        Rating::MAX,
        value.get()
    );
}

fn number(
    html: &mut String,
    name: &str,
    label: &str,
    value: &str,
    min: &str,
    max: Option<&str>,
    step: &str,
) {
    let max = max.map(|m| format!(" max=\"{m}\"")).unwrap_or_default();
    let _ = write!(
        html,
        "<label for=\"{name}\">{label}</label>\
         <input type=\"number\" id=\"{name}\" name=\"{name}\" min=\"{min}\"{max} step=\"{step}\" value=\"{}\">",
        escape(value)
    );
}
