use crate::api::prediction::PredictionInput;

const PAGE_TITLE: &str = "Car Selling Price Prediction";

/// A labeled numeric input on the form
struct NumericField {
    name: &'static str,
    label: &'static str,
    placeholder: &'static str,
}

const FIELDS: [NumericField; 3] = [
    NumericField {
        name: "year",
        label: "Year of Manufacture:",
        placeholder: "Enter year",
    },
    NumericField {
        name: "mileage",
        label: "Mileage (in KM/L):",
        placeholder: "Enter mileage",
    },
    NumericField {
        name: "max_power",
        label: "Max Power (in BHP):",
        placeholder: "Enter max power",
    },
];

/// Render the prediction form together with the current output text
pub fn render_page(input: &PredictionInput, output: &str) -> String {
    let values = [input.year, input.mileage, input.max_power];

    let fields: String = FIELDS
        .iter()
        .zip(values)
        .map(|(field, value)| render_field(field, value))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{title}</title>
</head>
<body>
  <h1 style="text-align: center">{title}</h1>
  <form method="post" action="/" style="width: 50%; margin: auto; padding: 20px; border: 1px solid black; border-radius: 10px; text-align: left">
{fields}    <input type="hidden" name="n_clicks" value="{n_clicks}">
    <button type="submit" id="predict-button" style="margin-top: 20px">Calculate</button>
  </form>
  <div id="output-prediction" style="text-align: center; margin-top: 20px; font-size: 20px">{output}</div>
</body>
</html>
"#,
        title = PAGE_TITLE,
        fields = fields,
        n_clicks = input.n_clicks,
        output = escape_html(output),
    )
}

fn render_field(field: &NumericField, value: Option<f64>) -> String {
    let value = value.map(|value| value.to_string()).unwrap_or_default();

    format!(
        r#"    <div style="margin-bottom: 30px">
      <label for="input-{name}">{label}</label>
      <input id="input-{name}" name="{name}" type="number" step="any" placeholder="{placeholder}" value="{value}" required style="width: 100%; margin-top: 10px">
    </div>
"#,
        name = field.name,
        label = escape_html(field.label),
        placeholder = field.placeholder,
        value = escape_html(&value),
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
