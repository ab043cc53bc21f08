//! Sources command - list built-in source profiles.

use colored::Colorize;
use floracheck::profiles;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", "Built-in sources:".yellow().bold());
    println!();

    for profile in profiles::all() {
        println!(
            "  {:10} {}",
            profile.id.cyan().bold(),
            profile.label.white()
        );

        let fields: Vec<String> = profile
            .fields
            .iter()
            .map(|rule| {
                if rule.update {
                    format!("{} (updatable)", rule.field.label())
                } else {
                    rule.field.label().to_string()
                }
            })
            .collect();
        println!("  {:10} fields: {}", "", fields.join(", "));

        let categories: Vec<&str> = profile.categories.iter().map(|c| c.token()).collect();
        println!("  {:10} exceptions: {}", "", categories.join(", "));
        println!(
            "  {:10} coverage: {:?}, untracked: {:?}",
            "", profile.coverage, profile.untracked
        );
        println!();
    }

    Ok(())
}
