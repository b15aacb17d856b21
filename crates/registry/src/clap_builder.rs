use std::collections::BTreeMap;

use clap::{Arg, ArgAction, Command as ClapCommand};
use heck::ToKebabCase;

use brickken_types::{FieldKind, FieldSpec, OperationSpec};

use crate::catalog::Catalog;

/// Builds the complete clap command tree from the operation catalog.
///
/// Operations are grouped by their resource prefix (before ':'), and each
/// operation becomes a subcommand whose flags mirror its field list. Field
/// names are camelCase on the wire; the flags use the kebab-case spelling
/// (`--token-symbol`), while the argument id keeps the wire name so values
/// can be collected back without a reverse mapping.
pub fn build_clap(catalog: &Catalog) -> ClapCommand {
    let mut root = create_root_command();
    let groups = group_operations_by_resource(catalog);

    for (group, ops) in groups {
        let group_command = build_group_command(&group, ops);
        root = root.subcommand(group_command);
    }

    root
}

/// Creates the root command with global flags.
///
/// - `--json` prints the raw response body
/// - `--verbose` enables debug logging
/// - `--dry-run` prints the request that would be sent, without sending it
fn create_root_command() -> ClapCommand {
    ClapCommand::new("brickken")
        .about("Brickken tokenization API CLI")
        .arg(
            Arg::new("json")
                .long("json")
                .help("JSON output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Verbose logging")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Print the request instead of sending it")
                .global(true)
                .action(ArgAction::SetTrue),
        )
}

/// Groups catalog operations by their resource prefix (before ':').
fn group_operations_by_resource(catalog: &Catalog) -> BTreeMap<String, Vec<&OperationSpec>> {
    let mut groups: BTreeMap<String, Vec<&OperationSpec>> = BTreeMap::new();
    for op in catalog.operations() {
        groups.entry(op.group.clone()).or_default().push(op);
    }

    groups
}

fn build_group_command(group: &str, ops: Vec<&OperationSpec>) -> ClapCommand {
    let static_group_name: &'static str = Box::leak(group.to_string().into_boxed_str());
    let mut group_cmd = ClapCommand::new(static_group_name);

    for op in ops {
        group_cmd = group_cmd.subcommand(build_subcommand(op));
    }

    group_cmd
}

fn build_subcommand(op: &OperationSpec) -> ClapCommand {
    let static_sub_name: &'static str = Box::leak(op.action().to_string().into_boxed_str());
    let mut subcommand = ClapCommand::new(static_sub_name).about(op.summary.clone());

    for field in &op.fields {
        subcommand = subcommand.arg(build_field_argument(field));
    }

    subcommand
}

/// Builds a single flag argument from a field spec.
///
/// Leaks the name strings to satisfy clap's 'static lifetime requirements;
/// the command tree is built once at startup.
fn build_field_argument(field: &FieldSpec) -> Arg {
    let id: &'static str = Box::leak(field.name.clone().into_boxed_str());
    let long: &'static str = Box::leak(field.name.to_kebab_case().into_boxed_str());
    // A default value always satisfies the requirement; clap would otherwise
    // demand the flag even though the spec provides a fallback.
    let mut arg = Arg::new(id)
        .long(long)
        .required(field.required && field.default_value.is_none());

    arg = match field.kind {
        FieldKind::Array => arg.action(ArgAction::Append),
        _ => arg.action(ArgAction::Set),
    };

    if field.kind == FieldKind::Enum && !field.enum_values.is_empty() {
        let values: Vec<&'static str> = field
            .enum_values
            .iter()
            .map(|s| Box::leak(s.clone().into_boxed_str()) as &'static str)
            .collect();
        arg = arg.value_parser(clap::builder::PossibleValuesParser::new(values));
    }

    if let Some(def) = &field.default_value {
        let dv: &'static str = Box::leak(def.clone().into_boxed_str());
        arg = arg.default_value(dv);
    }

    arg.help(help_text(field))
}

fn help_text(field: &FieldSpec) -> String {
    match &field.description {
        Some(desc) => desc.clone(),
        None => format!("{:?} value", field.kind).to_lowercase(),
    }
}
