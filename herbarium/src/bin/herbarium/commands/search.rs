use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Table};
use herbarium::Domain;
use herbarium::fields::format_number;
use herbarium::filters::{Filter, FilterParams, build_query};
use serde::Serialize;

use super::DomainArg;
use crate::context::CatalogContext;
use crate::examples::ExampleGroup;
use crate::input::FormArgs;
use crate::output::{GlobalOptions, OutputManager, TableDisplay, add_table_header, themed_table};

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Plant Search",
        commands: &[
            "herbarium search plant -f height-min=1 -f height-max=5",
            "herbarium search plant -f 'soil-type[]=clay' -f 'soil-type[]=sand'",
        ],
    },
    ExampleGroup {
        title: "Post Search",
        commands: &[
            "herbarium search post -f title=Roses -f author=ana",
            "herbarium --output compact search post -i filters.form   # Print only the URL",
        ],
    },
];

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Domain whose filter registry reads the form
    #[arg(value_enum)]
    pub domain: DomainArg,

    #[command(flatten)]
    pub form: FormArgs,
}

/// Active filters, their query string and the list page they navigate to.
#[derive(Debug, Serialize)]
pub struct SearchReport {
    pub domain: Domain,
    pub filters: Vec<Filter>,
    pub query: String,
    pub url: String,
}

impl TableDisplay for SearchReport {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = themed_table(options);
        add_table_header(&mut table, options, &["Type", "Input", "Shape", "Params"]);
        for filter in &self.filters {
            table.add_row(vec![
                Cell::new(filter.query_key()),
                Cell::new(filter.name()),
                Cell::new(format!("{:?}", filter.shape()).to_lowercase()),
                Cell::new(describe_params(&filter.params)),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        self.url.clone()
    }
}

fn describe_params(params: &FilterParams) -> String {
    match params {
        FilterParams::Text(values) => values
            .iter()
            .map(|(key, value)| format!("{key}: {value}"))
            .collect::<Vec<_>>()
            .join(", "),
        FilterParams::Range { min, max } => format!("{} to {}", format_number(*min), format_number(*max)),
        FilterParams::Options { possible_values } => possible_values.join(", "),
    }
}

pub fn handle_search(args: SearchArgs, output: &OutputManager) -> Result<()> {
    let domain = Domain::from(args.domain);
    let forms = args.form.load()?;
    let routes = CatalogContext::find()?.routes();

    let filters = domain.filters().parse_multiple_forms(&forms);
    let query = build_query(&filters)?;
    let url = routes.search_page(domain, &filters)?;

    if filters.is_empty() {
        output.info(&format!("No {domain} filters active"));
    }
    output.heading(&format!("{domain} search"));
    let report = SearchReport {
        domain,
        filters,
        query,
        url,
    };
    output.display(&report)?;
    output.key_value("URL", &report.url);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use herbarium::domains::PLANT_FILTERS;
    use herbarium::form::FormData;

    #[test]
    fn params_read_naturally() {
        let form = FormData::from_pairs([
            ("height-min", "1"),
            ("height-max", "5"),
            ("soil-type[]", "clay"),
            ("soil-type[]", "sand"),
        ]);
        let filters = PLANT_FILTERS.parse_form(&form);
        let described: Vec<String> = filters.iter().map(|filter| describe_params(&filter.params)).collect();
        assert_eq!(described, vec!["1 to 5", "clay, sand"]);
    }

    #[test]
    fn report_serializes_filter_declarations() {
        let form = FormData::from_pairs([("latin-name", "Quercus")]);
        let filters = PLANT_FILTERS.parse_form(&form);
        let report = SearchReport {
            domain: Domain::Plant,
            query: build_query(&filters).unwrap(),
            url: "/view/plants?latin_name=Quercus".into(),
            filters,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["domain"], "plant");
        assert_eq!(json["filters"][0]["type"], "latin_name");
        assert_eq!(json["filters"][0]["params"]["latin-name"], "Quercus");
        assert_eq!(json["query"], "latin_name=Quercus");
    }
}
