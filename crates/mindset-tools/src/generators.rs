//! The application generators shipped with `mindset`

use regex::Regex;
use scaffolder_core::{
    Action, ActionGroup, ActionPlanner, Choice, Generator, GeneratorRegistry, Prompt, Trigger,
};
use std::sync::OnceLock;

/// Template directory (under the template root) holding the generator templates
pub const TEMPLATE_SUBDIR: &str = "mindset";

/// App directories that never hold components or routes
const COMPONENT_DIRECTORY_PATTERN: &str =
    r"^src/app/(_lib|_schemas|_actions|_assets|api|_pdfs|_emails|_models|I|cron)/?.*$";

fn pascal_case() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Z][a-z]+(?:[A-Z][a-z]+)*$").expect("valid regex"))
}

fn camel_case() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-z]+(?:[A-Z][a-z]+)*$").expect("valid regex"))
}

fn required(value: &str, message: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(message.to_string())
    } else {
        Ok(())
    }
}

fn pascal_name(what: &'static str) -> impl Fn(&str) -> Result<(), String> + Send + Sync {
    move |value| {
        required(value, &format!("A {} name is required", what))?;
        if !pascal_case().is_match(value) {
            return Err(format!("The {} name must be in PascalCase", what));
        }
        Ok(())
    }
}

fn camel_name(what: &'static str) -> impl Fn(&str) -> Result<(), String> + Send + Sync {
    move |value| {
        required(value, &format!("A {} name is required", what))?;
        if !camel_case().is_match(value) {
            return Err(format!("The {} name must be in camelCase", what));
        }
        Ok(())
    }
}

fn app_directory(message: &str) -> Prompt {
    let prompt = Prompt::path_select("dir", message, "src/app")
        .exclude_containing("_components")
        .validate(|value| {
            required(value, "A directory is required")?;
            if !value.trim().starts_with("src/app") {
                return Err("The directory must be inside the src/app folder".to_string());
            }
            Ok(())
        });

    match Regex::new(COMPONENT_DIRECTORY_PATTERN) {
        Ok(pattern) => prompt.exclude_path(pattern).into(),
        Err(_) => prompt.into(),
    }
}

/// Primary `<kind>.tsx` route file plus its story
fn route_file(kind: &str) -> ActionGroup {
    ActionGroup::new(
        Trigger::includes("types", kind),
        Action::add_file(
            format!("{{{{ dir.original }}}}/{}.tsx", kind),
            format!("{}.hbs", kind),
        ),
    )
    .companion(Action::add_file(
        format!("{{{{ dir.original }}}}/{}.stories.tsx", kind),
        format!("{}.stories.hbs", kind),
    ))
}

fn component() -> Generator {
    Generator::new(
        "component",
        "Create a new component in the app",
        ActionPlanner::Fixed(vec![
            Action::add_file("{{ dir.original }}/_components/{{ name }}.tsx", "component.hbs"),
            Action::add_file(
                "{{ dir.original }}/_components/{{ name }}.stories.tsx",
                "component.stories.hbs",
            ),
        ]),
    )
    .prompt(app_directory("Where should the component be created?"))
    .prompt(Prompt::text("name", "What is your component name?").validate(pascal_name("component")))
}

fn route() -> Generator {
    let groups = vec![
        route_file("page"),
        route_file("loading"),
        route_file("layout"),
        route_file("error"),
        route_file("not-found"),
        route_file("template"),
        // No story for parallel-route defaults
        ActionGroup::new(
            Trigger::includes("types", "default"),
            Action::add_file("{{ dir.original }}/default.tsx", "default.hbs"),
        ),
    ];

    Generator::new("route", "Create a new route in the app", ActionPlanner::Grouped(groups))
        .prompt(app_directory("Where should the route be created?"))
        .prompt(
            Prompt::multi_select(
                "types",
                "What type of route should be added?",
                vec![
                    Choice::new("Page", "page").checked(true),
                    Choice::new("Layout", "layout").checked(true),
                    Choice::new("Loading", "loading").checked(true),
                    Choice::new("Default", "default"),
                    Choice::new("Error", "error"),
                    Choice::new("Not Found", "not-found"),
                    Choice::new("Template", "template"),
                ],
            )
            .validate(|selected| {
                if selected.is_empty() {
                    Err("At least one type must be selected".to_string())
                } else {
                    Ok(())
                }
            }),
        )
}

fn email() -> Generator {
    Generator::new(
        "email",
        "Create a new email in the app",
        ActionPlanner::Fixed(vec![
            Action::add_file("src/app/_emails/{{ pascalCase name }}.tsx", "email.hbs").overwrite(),
            Action::add_file(
                "src/app/_emails/{{ pascalCase name }}.stories.tsx",
                "email.stories.hbs",
            ),
        ]),
    )
    .prompt(
        Prompt::text("name", "What is your email name?")
            .validate(|value| required(value, "An email name is required")),
    )
}

fn pdf() -> Generator {
    Generator::new(
        "pdf",
        "Create a new pdf in the app",
        ActionPlanner::Fixed(vec![
            Action::add_file("src/app/_pdfs/{{ name }}.tsx", "pdf.hbs").overwrite(),
            Action::add_file("src/app/_pdfs/{{ name }}.stories.tsx", "pdf.stories.hbs"),
        ]),
    )
    .prompt(Prompt::text("name", "What is your pdf name?").validate(pascal_name("pdf")))
}

fn schema() -> Generator {
    let check = pascal_name("schema");
    Generator::new(
        "schema",
        "Create a new schema in the app",
        ActionPlanner::Fixed(vec![
            Action::add_file("src/app/_schemas/{{ name }}Schema.ts", "schema.hbs").overwrite(),
            Action::add_file("src/app/_schemas/{{ name }}Schema.test.ts", "schema.test.hbs"),
        ]),
    )
    .prompt(
        Prompt::text("name", "What is your schema name?").validate(move |value| {
            check(value)?;
            if value.ends_with("Schema") {
                return Err("The schema name should not end with Schema".to_string());
            }
            Ok(())
        }),
    )
}

fn action() -> Generator {
    Generator::new(
        "action",
        "Create a new action in the app",
        ActionPlanner::Grouped(vec![
            ActionGroup::always(Action::add_file("src/app/_actions/{{ name }}.ts", "action.hbs"))
                .companion(Action::add_file(
                    "src/app/_actions/{{ name }}.mock.ts",
                    "action.mock.hbs",
                )),
            ActionGroup::new(
                Trigger::confirmed("schema"),
                Action::add_file(
                    "src/app/_schemas/{{ pascalCase name }}FormDataSchema.ts",
                    "action-schema.hbs",
                ),
            )
            .companion(Action::add_file(
                "src/app/_schemas/{{ pascalCase name }}FormDataSchema.test.ts",
                "action-schema.test.hbs",
            )),
        ]),
    )
    .prompt(Prompt::text("name", "What is your action name?").validate(camel_name("action")))
    .prompt(Prompt::confirm("schema", "Does this action require a schema?").default_value(true))
}

fn model() -> Generator {
    Generator::new(
        "model",
        "Create a new model in the app",
        ActionPlanner::Fixed(vec![
            Action::add_file("src/app/_models/{{ name }}.{{ extension }}", "model.hbs"),
            Action::append(
                "src/app/_models/models.ts",
                "export const {{name}}Model = getModelForClass({{name}});",
                "// Append model here",
            ),
            Action::append(
                "src/app/_models/models.ts",
                "import { {{name}} } from '#app/_models/{{name}}.{{ extension }}';",
                "// Append import here",
            ),
            Action::add_file("src/app/_models/{{name}}.db.ts", "model.db.hbs"),
            Action::add_file("src/app/_models/{{name}}.fixtures.ts", "model.fixtures.hbs"),
        ]),
    )
    .prompt(Prompt::text("name", "What is your model name?").validate(pascal_name("model")))
    .prompt(
        Prompt::select(
            "extension",
            "What is your model extension?",
            vec![Choice::new("ts", "ts"), Choice::new("tsx", "tsx")],
        )
        .default_value("ts"),
    )
}

fn query() -> Generator {
    Generator::new(
        "query",
        "Create a new query in the app",
        ActionPlanner::Fixed(vec![
            Action::add_file("src/app/_queries/{{ name }}.ts", "query.hbs"),
            Action::add_file("src/app/_queries/{{ name }}.mock.ts", "query.mock.hbs"),
        ]),
    )
    .prompt(Prompt::text("name", "What is your query name?").validate(camel_name("query")))
}

/// Registry with every built-in generator, in menu order
pub fn registry() -> scaffolder_core::Result<GeneratorRegistry> {
    let mut registry = GeneratorRegistry::new();
    for generator in [
        component(),
        route(),
        email(),
        pdf(),
        schema(),
        action(),
        model(),
        query(),
    ] {
        registry.register(generator)?;
    }
    Ok(registry)
}
