use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Table};
use herbarium::Domain;
use herbarium::fields::{Field, FieldTarget, serialize_fields};
use herbarium::form::FormData;
use serde::Serialize;

use super::{DomainArg, compact_form, describe_entry, describe_value};
use crate::examples::ExampleGroup;
use crate::input::FormArgs;
use crate::output::{GlobalOptions, OutputManager, TableDisplay, add_table_header, themed_table};

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Plant Forms",
        commands: &[
            "herbarium parse plant -f category=tree -f tree.height=12.5 -f latin-name=Quercus",
            "herbarium parse plant -f name=Oak -f photo=@oak.jpg    # Attach a file",
        ],
    },
    ExampleGroup {
        title: "Post Forms",
        commands: &[
            "herbarium parse post -f title=Spring -f 'tags[]=garden' -f 'tags[]=bulbs'",
            "herbarium --output json parse post -i post.form        # Read a url-encoded body",
        ],
    },
];

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Domain whose field registry reads the form
    #[arg(value_enum)]
    pub domain: DomainArg,

    #[command(flatten)]
    pub form: FormArgs,
}

/// Parsed fields and the multipart payload they serialize to.
#[derive(Debug, Serialize)]
pub struct ParseReport {
    pub domain: Domain,
    pub fields: Vec<Field>,
    pub payload: FormData,
}

impl TableDisplay for ParseReport {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = themed_table(options);
        add_table_header(&mut table, options, &["Field", "Kind", "Target", "Value"]);
        for field in &self.fields {
            let target = match field.target() {
                FieldTarget::Flat => field.output_name().to_string(),
                FieldTarget::Specification => format!("specification.{}", field.output_name()),
            };
            table.add_row(vec![
                Cell::new(field.id()),
                Cell::new(field.kind()),
                Cell::new(target),
                Cell::new(field.value().map(describe_value).unwrap_or_default()),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        compact_form(&self.payload)
    }
}

pub fn handle_parse(args: ParseArgs, output: &OutputManager) -> Result<()> {
    let domain = Domain::from(args.domain);
    let forms = args.form.load()?;

    let fields = domain.fields().parse_multiple_forms(&forms)?;
    if fields.is_empty() {
        output.warning(&format!("No {domain} fields found in the submitted form"));
    }
    let payload = serialize_fields(&fields)?;
    output.verbose(&format!("{} fields, {} payload entries", fields.len(), payload.len()));

    output.heading(&format!("{domain} form"));
    let report = ParseReport {
        domain,
        fields,
        payload,
    };
    output.display(&report)?;

    if !report.payload.is_empty() {
        output.heading("Payload");
        for (key, value) in report.payload.iter() {
            output.key_value(key, &describe_entry(value));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use herbarium::domains::PLANT_FIELDS;

    #[test]
    fn compact_output_is_the_payload() {
        let form = FormData::from_pairs([("category", "tree"), ("tree.height", "12.5"), ("latin-name", "Quercus")]);
        let fields = PLANT_FIELDS.parse_form(&form).unwrap();
        let payload = serialize_fields(&fields).unwrap();
        let report = ParseReport {
            domain: Domain::Plant,
            fields,
            payload,
        };
        assert_eq!(
            report.to_compact(),
            r#"latin_name=Quercus&category=tree&specification={"height_m":12.5}"#
        );
    }
}
