
use indicatif::{ProgressState, ProgressStyle};

/// Shared progress bar styling
/// # Arguments
/// * `unit` - label for the items being counted, e.g. "groups"
pub fn get_progress_style(unit: &str) -> ProgressStyle {
    let template = format!(
        "[{{elapsed_precise}}] {{bar:40.cyan/blue}} {{pos}}/{{len}} {unit} ({{percent}}); ETA: {{eta_precise}} {{msg}}"
    );
    ProgressStyle::with_template(&template)
        .unwrap()
        .with_key("percent", |state: &ProgressState, w: &mut dyn std::fmt::Write| write!(w, "{:.1}%", state.fraction()*100.0).unwrap())
        .progress_chars("##-")
}
