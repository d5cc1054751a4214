// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! `disposer rules` and `disposer explain`: rule documentation.

use disposer_core::analysis::RuleDescriptor;
use disposer_core::lint::{all_rules, find_rule};
use miette::Result;

/// One line per registered rule: `id  category  title`.
pub fn format_rule_list() -> String {
    let mut out = String::new();
    for rule in all_rules() {
        let descriptor = rule.descriptor();
        out.push_str(&format!(
            "{}  {:<8}  {}\n",
            descriptor.id,
            descriptor.category.as_str(),
            descriptor.title
        ));
    }
    out
}

/// Full documentation of one rule.
pub fn format_explanation(descriptor: &RuleDescriptor) -> String {
    format!(
        "{id}: {title}\n\n{description}\n\nCategory: {category}\nDefault severity: {severity}\nMessage: {message}\nMore information: {url}\n",
        id = descriptor.id,
        title = descriptor.title,
        description = descriptor.description,
        category = descriptor.category.as_str(),
        severity = descriptor.default_severity.as_str(),
        message = descriptor.message_format,
        url = descriptor.help_url,
    )
}

/// Prints the registered rules.
pub fn list_rules() {
    print!("{}", format_rule_list());
}

/// Prints the documentation of `id`.
pub fn explain(id: &str) -> Result<()> {
    let Some(rule) = find_rule(id) else {
        miette::bail!(
            help = "run `disposer rules` to list rule ids",
            "Unknown rule '{id}'"
        );
    };
    print!("{}", format_explanation(rule.descriptor()));
    Ok(())
}
