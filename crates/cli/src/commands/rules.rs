use crate::exit_code::ExitCode;
use colored::Colorize;
use relay_linter::{source_rules, LintSeverity};

pub fn run() -> ExitCode {
    let mut rules: Vec<_> = source_rules().iter().collect();
    rules.sort_by_key(|rule| rule.name());

    println!("{}", "Available lint rules:".bold());
    for rule in rules {
        let severity = match rule.default_severity() {
            LintSeverity::Error => "error".red(),
            LintSeverity::Warning => "warning".yellow(),
            LintSeverity::Info => "info".cyan(),
            LintSeverity::Off => "off".dimmed(),
        };
        println!("\n  {} ({severity})", rule.name().bold());
        println!("    {}", rule.description());
    }
    ExitCode::Success
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_linter::rule_by_name;

    #[test]
    fn every_registered_rule_resolves_by_name() {
        for rule in source_rules() {
            assert!(rule_by_name(rule.name()).is_some());
        }
    }
}
