use std::path::Path;

use console::Style;
use darkroom_core::experiment::{ExperimentResult, Verdict};
use darkroom_core::metrics::{Diagnosis, DiagnosisVerdict};

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    good: Style,
    bad: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            good: Style::new().green(),
            bad: Style::new().yellow(),
            path: Style::new().underlined(),
        }
    }

    fn verdict(&self, verdict: Verdict) -> &Style {
        match verdict {
            Verdict::Recommended => &self.good,
            Verdict::Good => &self.value,
            Verdict::Marginal => &self.label,
        }
    }
}

pub fn print_diagnosis(file: &Path, diagnosis: &Diagnosis) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Image Diagnosis"));
    println!("  {}", s.title.apply_to("\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}"));
    println!();

    println!(
        "  {:<18}{}",
        s.label.apply_to("File"),
        s.path.apply_to(file.display())
    );
    println!(
        "  {:<18}{}",
        s.label.apply_to("SNR"),
        s.value.apply_to(format!("{:.2} dB", diagnosis.snr_db))
    );
    println!(
        "  {:<18}{}",
        s.label.apply_to("Entropy"),
        s.value.apply_to(format!("{:.3} bits", diagnosis.entropy))
    );
    println!(
        "  {:<18}{}",
        s.label.apply_to("Mean intensity"),
        s.value.apply_to(format!("{:.1}", diagnosis.mean_intensity))
    );
    println!(
        "  {:<18}{}",
        s.label.apply_to("Dynamic range"),
        s.value.apply_to(format!("{:.1}%", diagnosis.dynamic_range_usage_pct))
    );
    println!(
        "  {:<18}{}",
        s.label.apply_to("Dark pixels"),
        s.value.apply_to(format!("{:.1}%", diagnosis.dark_pixels_pct))
    );
    println!(
        "  {:<18}{}",
        s.label.apply_to("Outliers"),
        s.value.apply_to(format!("{:.1}%", diagnosis.outliers_pct))
    );

    let verdict_style = match diagnosis.verdict {
        DiagnosisVerdict::Ok => &s.good,
        DiagnosisVerdict::LowContrastDark => &s.bad,
    };
    println!(
        "  {:<18}{}",
        s.label.apply_to("Verdict"),
        verdict_style.apply_to(diagnosis.verdict)
    );
    println!();
}

pub fn print_experiment_summary(result: &ExperimentResult) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Experiment Results"));
    println!("  {}", s.title.apply_to("\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}"));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Artifacts"),
        s.path.apply_to(result.experiment_dir.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Baseline SNR"),
        s.value.apply_to(format!("{:.2} dB", result.original.snr_db))
    );
    println!();

    println!(
        "  {}",
        s.header.apply_to(format!(
            "{:<20} {:>10} {:>10} {:>10}  {}",
            "Strategy", "SNR (dB)", "\u{0394}SNR", "Entropy", "Verdict"
        ))
    );
    for outcome in &result.results {
        println!(
            "  {:<20} {:>10.2} {:>10.2} {:>10.3}  {}",
            s.value.apply_to(&outcome.strategy),
            outcome.metrics.snr_db,
            outcome.delta_snr,
            outcome.metrics.entropy,
            s.verdict(outcome.verdict).apply_to(outcome.verdict)
        );
    }
    println!();

    match &result.summary.best_strategy {
        Some(best) => {
            println!(
                "  {:<14}{} ({:+.2} dB)",
                s.label.apply_to("Best"),
                s.good.apply_to(best),
                result.summary.best_delta_snr
            );
        }
        None => {
            println!(
                "  {:<14}{}",
                s.label.apply_to("Best"),
                s.bad.apply_to("no strategy completed")
            );
        }
    }
    if !result.summary.recommended_strategies.is_empty() {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Recommended"),
            s.good
                .apply_to(result.summary.recommended_strategies.join(", "))
        );
    }
    println!();
}
