use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use tabled::settings::Style;
use tabled::{Table, Tabled};
use termtree::Tree;

use crate::providers::Provider;
use crate::providers::azurerm::terraform_name;
use crate::resource::Resource;
use crate::resourceids::IdSummary;
use crate::terraform::DriftReport;

#[derive(Tabled)]
struct ResourceRow {
    #[tabled(rename = "Type")]
    resource_type: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Resource Group")]
    resource_group: String,
    #[tabled(rename = "ID")]
    id: String,
}

#[derive(Tabled)]
struct DriftRow {
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Resource")]
    resource: String,
    #[tabled(rename = "ID")]
    id: String,
}

pub fn resource_table(resources: &[Resource]) -> String {
    let rows = resources.iter().map(|r| ResourceRow {
        resource_type: r.resource_type.clone(),
        name: r.name.clone(),
        resource_group: r.resource_group.clone(),
        id: r.resource_id.clone(),
    });
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn drift_table(report: &DriftReport) -> String {
    let unmanaged = report.unmanaged.iter().map(|r| DriftRow {
        status: "unmanaged",
        resource: format!("{}.{}", r.resource_type, terraform_name(&r.name)),
        id: r.resource_id.clone(),
    });
    let missing = report.missing.iter().map(|e| DriftRow {
        status: "missing",
        resource: e.address.clone(),
        id: e.id.clone(),
    });

    let table = Table::new(unmanaged.chain(missing))
        .with(Style::rounded())
        .to_string();
    format!(
        "{}\n{} managed, {} unmanaged, {} missing",
        table,
        report.managed,
        report.unmanaged.len(),
        report.missing.len()
    )
}

/// The parsed components of an ID as a tree rooted at its type.
pub fn id_tree(summary: &IdSummary) -> String {
    let leaves = summary
        .components
        .iter()
        .map(|(label, value)| Tree::new(format!("{}: {}", label, value)));
    let tree = Tree::new(format!("{} {}", summary.id_type, summary.id)).with_leaves(leaves);
    tree.to_string()
}

/// One import block per resource. Names that collide after sanitising get a
/// numeric suffix so the file stays valid HCL.
pub fn import_blocks(provider: &dyn Provider, resources: &[Resource]) -> String {
    let mut seen: HashMap<(String, String), usize> = HashMap::new();
    let mut blocks = Vec::with_capacity(resources.len());

    for resource in resources {
        let key = (resource.resource_type.clone(), terraform_name(&resource.name));
        let count = seen.entry(key.clone()).or_insert(0);
        *count += 1;

        if *count == 1 {
            blocks.push(provider.generate_import(resource));
        } else {
            let renamed = Resource {
                name: format!("{}_{}", key.1, count),
                ..resource.clone()
            };
            tracing::debug!(name = %resource.name, renamed = %renamed.name, "deduplicated import name");
            blocks.push(provider.generate_import(&renamed));
        }
    }

    let mut output = blocks.join("\n\n");
    if !output.is_empty() {
        output.push('\n');
    }
    output
}

/// Writes to `path`, or stdout when no path is given.
pub fn write_output(contents: &str, path: Option<&Path>) -> std::io::Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, contents)?;
            tracing::info!(path = %path.display(), "wrote output");
            Ok(())
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(contents.as_bytes())?;
            if !contents.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
            stdout.flush()
        }
    }
}
