//! Template listing for the nbforge CLI.

use nbforge_core::Exporter;

/// Print the available templates.
pub fn list(exporter: &Exporter) {
    let templates = exporter.available_templates();
    if templates.is_empty() {
        println!("No templates found.");
        return;
    }

    println!("Available templates:");
    for name in templates {
        println!("  - {}", name);
    }
}
