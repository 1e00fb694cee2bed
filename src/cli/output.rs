//! Output formatting for CLI

use crate::pipeline::TrainingResult;

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Format a rate in [0, 1] as a percentage
pub fn format_percent(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Print totals and the per-window breakdown of a training run
pub fn print_training_result(result: &TrainingResult) {
    print_kv("Episodes", &format_number(result.total_episodes));
    print_kv(
        "Wins",
        &format!("{} ({})", result.wins, format_percent(result.win_rate)),
    );
    print_kv(
        "Draws",
        &format!("{} ({})", result.draws, format_percent(result.draw_rate)),
    );
    print_kv(
        "Losses",
        &format!("{} ({})", result.losses, format_percent(result.loss_rate)),
    );

    if result.windows.len() > 1 {
        println!("\n  {:>10} {:>8} {:>8} {:>8}", "from", "win", "draw", "loss");
        for window in &result.windows {
            println!(
                "  {:>10} {:>8} {:>8} {:>8}",
                format_number(window.start_episode),
                window.wins,
                window.draws,
                window.losses
            );
        }
    }
}
