use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use comfy_table::{Cell, Table};
use herbarium::domains::{AlbumDraft, AlbumEdit, Credentials, Registration, parse_id_list};
use herbarium::{ApiRequest, Domain, Field, RequestBody, RouteContext, entity_id_from_path};
use serde::Serialize;
use uuid::Uuid;

use super::join_form;
use crate::context::CatalogContext;
use crate::examples::ExampleGroup;
use crate::input::FormArgs;
use crate::output::{GlobalOptions, OutputManager, TableDisplay, add_table_header, themed_table};

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Plants",
        commands: &[
            "herbarium plan plant-create -f name=Oak -f category=tree -f tree.height=12.5",
            "herbarium plan plant-update --id /view/plant/<id>/update -i plant.form",
            "herbarium plan plant-delete --id <id>",
        ],
    },
    ExampleGroup {
        title: "Albums",
        commands: &[
            "herbarium plan album-create --name Shade --plant <id> --plant <id>",
            "herbarium plan album-update --id <id> --name Shade --initial <a>,<b> --plant <b>",
        ],
    },
    ExampleGroup {
        title: "Accounts",
        commands: &[
            "herbarium plan login --username ana --password <password>",
            "HERBARIUM_PASSWORD=<password> herbarium plan register --email ana@example.org --username ana --password-confirm <password>",
        ],
    },
    ExampleGroup {
        title: "Lookups",
        commands: &["herbarium plan autocomplete fern             # Plant autocomplete request"],
    },
];

/// Target entity, as a bare id or a page path such as `/view/plant/<id>/update`
#[derive(Args, Debug, Clone)]
pub struct IdArg {
    /// Entity id or page path carrying it
    #[arg(long = "id", value_name = "ID|PATH")]
    pub id: String,
}

impl IdArg {
    fn resolve(&self) -> Result<Uuid> {
        if let Ok(id) = Uuid::parse_str(&self.id) {
            return Ok(id);
        }
        entity_id_from_path(&self.id).with_context(|| format!("Invalid entity id `{}`", self.id))
    }
}

#[derive(Subcommand, Debug)]
pub enum PlanCommands {
    /// Create a plant from a submitted form
    #[command(name = "plant-create")]
    PlantCreate {
        #[command(flatten)]
        form: FormArgs,
    },

    /// Update a plant's specification from a submitted form
    #[command(name = "plant-update")]
    PlantUpdate {
        #[command(flatten)]
        id: IdArg,
        #[command(flatten)]
        form: FormArgs,
    },

    /// Delete a plant
    #[command(name = "plant-delete")]
    PlantDelete {
        #[command(flatten)]
        id: IdArg,
    },

    /// Create a post from a submitted form
    #[command(name = "post-create")]
    PostCreate {
        #[command(flatten)]
        form: FormArgs,
    },

    /// Update a post's text from a submitted form
    #[command(name = "post-update")]
    PostUpdate {
        #[command(flatten)]
        id: IdArg,
        #[command(flatten)]
        form: FormArgs,
    },

    /// Delete a post
    #[command(name = "post-delete")]
    PostDelete {
        #[command(flatten)]
        id: IdArg,
    },

    /// Create an album
    #[command(name = "album-create")]
    AlbumCreate {
        /// Album name
        #[arg(long, default_value = "")]
        name: String,

        /// Album description
        #[arg(long, default_value = "")]
        description: String,

        /// Selected plant id (repeatable)
        #[arg(long = "plant", value_name = "ID")]
        plants: Vec<String>,
    },

    /// Rename, describe and re-select the plants of an album
    #[command(name = "album-update")]
    AlbumUpdate {
        #[command(flatten)]
        id: IdArg,

        /// Album name
        #[arg(long, default_value = "")]
        name: String,

        /// Album description
        #[arg(long, default_value = "")]
        description: String,

        /// Comma-separated plant ids the album held when the page loaded
        #[arg(long, default_value = "", value_name = "IDS")]
        initial: String,

        /// Plant id selected after editing (repeatable)
        #[arg(long = "plant", value_name = "ID")]
        plants: Vec<String>,
    },

    /// Delete an album
    #[command(name = "album-delete")]
    AlbumDelete {
        #[command(flatten)]
        id: IdArg,
    },

    /// Sign in
    #[command(name = "login")]
    Login {
        /// Account name
        #[arg(long)]
        username: String,

        /// Account password
        #[arg(long, env = "HERBARIUM_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account
    #[command(name = "register")]
    Register {
        /// Contact email
        #[arg(long)]
        email: String,

        /// Account name
        #[arg(long)]
        username: String,

        /// Account password
        #[arg(long, env = "HERBARIUM_PASSWORD", hide_env_values = true)]
        password: String,

        /// Password repeated for confirmation
        #[arg(long)]
        password_confirm: String,
    },

    /// Plant lookup issued by the album editor
    #[command(name = "autocomplete")]
    Autocomplete {
        /// Name prefix to search for
        #[arg(default_value = "")]
        query: String,
    },
}

/// Backend calls in execution order.
#[derive(Debug, Serialize)]
pub struct RequestPlan {
    pub requests: Vec<ApiRequest>,
}

impl TableDisplay for RequestPlan {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = themed_table(options);
        add_table_header(&mut table, options, &["Method", "Path", "Body", "Redirect"]);
        for request in &self.requests {
            table.add_row(vec![
                Cell::new(request.method.as_str()),
                Cell::new(&request.path),
                Cell::new(describe_body(&request.body, "\n")),
                Cell::new(request.redirect.as_deref().unwrap_or("-")),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        self.requests
            .iter()
            .map(|request| {
                let body = describe_body(&request.body, "&");
                if body.is_empty() {
                    format!("{} {}", request.method.as_str(), request.path)
                } else {
                    format!("{} {} {body}", request.method.as_str(), request.path)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn describe_body(body: &RequestBody, separator: &str) -> String {
    match body {
        RequestBody::Empty => String::new(),
        RequestBody::Multipart(form) => join_form(form, separator),
        RequestBody::Json(value) => value.to_string(),
    }
}

fn form_fields(domain: Domain, form: &FormArgs) -> Result<Vec<Field>> {
    let forms = form.load()?;
    Ok(domain.fields().parse_multiple_forms(&forms)?)
}

pub fn build_plan(command: PlanCommands, routes: &RouteContext) -> Result<RequestPlan> {
    let requests = match command {
        PlanCommands::PlantCreate { form } => vec![routes.plant_create(&form_fields(Domain::Plant, &form)?)?],
        PlanCommands::PlantUpdate { id, form } => {
            vec![routes.plant_update(id.resolve()?, &form_fields(Domain::Plant, &form)?)?]
        }
        PlanCommands::PlantDelete { id } => vec![routes.plant_delete(id.resolve()?)],
        PlanCommands::PostCreate { form } => vec![routes.post_create(&form_fields(Domain::Post, &form)?)?],
        PlanCommands::PostUpdate { id, form } => {
            vec![routes.post_update_text(id.resolve()?, &form_fields(Domain::Post, &form)?)?]
        }
        PlanCommands::PostDelete { id } => vec![routes.post_delete(id.resolve()?)],
        PlanCommands::AlbumCreate {
            name,
            description,
            plants,
        } => {
            let draft = AlbumDraft::new(name, description).with_plants(plants.into_iter().filter(|id| !id.is_empty()));
            vec![routes.album_create(&draft)]
        }
        PlanCommands::AlbumUpdate {
            id,
            name,
            description,
            initial,
            plants,
        } => {
            let edit = AlbumEdit {
                name,
                description,
                initial_plant_ids: parse_id_list(&initial),
                selected_plant_ids: plants.into_iter().filter(|id| !id.is_empty()).collect(),
            };
            routes.album_update(id.resolve()?, &edit)
        }
        PlanCommands::AlbumDelete { id } => vec![routes.album_delete(id.resolve()?)],
        PlanCommands::Login { username, password } => vec![routes.login(&Credentials { username, password })?],
        PlanCommands::Register {
            email,
            username,
            password,
            password_confirm,
        } => {
            let registration = Registration {
                email,
                username,
                password,
                password_confirm,
            };
            vec![routes.register(&registration)?]
        }
        PlanCommands::Autocomplete { query } => vec![routes.plant_autocomplete(&query)],
    };
    Ok(RequestPlan { requests })
}

pub fn handle_plan_commands(command: PlanCommands, output: &OutputManager) -> Result<()> {
    let ctx = CatalogContext::find()?;
    if let Some(path) = &ctx.config_path {
        output.verbose(&format!("Using routes from {}", path.display()));
    }

    let plan = build_plan(command, &ctx.routes())?;
    output.heading("Request plan");
    output.display(&plan)?;
    output.success(&format!("{} request(s) planned", plan.requests.len()));
    Ok(())
}
