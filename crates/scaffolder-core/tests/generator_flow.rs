//! End-to-end generator runs against a temporary project

use scaffolder_core::{
    Action, ActionExecutor, ActionGroup, ActionPlanner, Answers, Choice, Error, Generator,
    GeneratorRegistry, Outcome, Prompt, SelectedPath, Trigger,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const MODELS: &str = "import { getModelForClass } from '@typegoose/typegoose';\n\
                      // Append import here\n\
                      \n\
                      // Append model here\n";

struct Fixture {
    templates: TempDir,
    project: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let templates = tempfile::tempdir().unwrap();
        write(templates.path(), "page.hbs", "export default function {{ pascalCase name }}Page() {}\n");
        write(templates.path(), "page.stories.hbs", "// {{ name }} page stories\n");
        write(templates.path(), "error.hbs", "'use client';\n// {{ name }} error\n");
        write(templates.path(), "error.stories.hbs", "// {{ name }} error stories\n");
        write(templates.path(), "layout.hbs", "// layout\n");
        write(templates.path(), "model.hbs", "export class {{ name }} {}\n");

        let project = tempfile::tempdir().unwrap();
        write(project.path(), "src/app/_models/models.ts", MODELS);
        fs::create_dir_all(project.path().join("src/app/dashboard")).unwrap();

        Self { templates, project }
    }

    fn executor(&self) -> ActionExecutor {
        ActionExecutor::new(self.project.path()).with_template_root(self.templates.path())
    }

    fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.project.path().join(relative)).unwrap()
    }
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn registry() -> GeneratorRegistry {
    let route = Generator::new(
        "route",
        "Create route files",
        ActionPlanner::Grouped(vec![
            ActionGroup::new(
                Trigger::includes("types", "page"),
                Action::add_file("{{ dir.original }}/page.tsx", "page.hbs"),
            )
            .companion(Action::add_file("{{ dir.original }}/page.stories.tsx", "page.stories.hbs")),
            ActionGroup::new(
                Trigger::includes("types", "layout"),
                Action::add_file("{{ dir.original }}/layout.tsx", "layout.hbs"),
            ),
            ActionGroup::new(
                Trigger::includes("types", "error"),
                Action::add_file("{{ dir.original }}/error.tsx", "error.hbs"),
            )
            .companion(Action::add_file("{{ dir.original }}/error.stories.tsx", "error.stories.hbs")),
        ]),
    )
    .prompt(Prompt::path_select("dir", "Where is the route?", "src/app"))
    .prompt(Prompt::text("name", "Route name"))
    .prompt(Prompt::multi_select(
        "types",
        "Which files?",
        vec![
            Choice::new("Page", "page").checked(true),
            Choice::new("Layout", "layout"),
            Choice::new("Error", "error"),
        ],
    ));

    let model = Generator::new(
        "model",
        "Create a model",
        ActionPlanner::Fixed(vec![
            Action::add_file("src/app/_models/{{ name }}.ts", "model.hbs"),
            Action::append(
                "src/app/_models/models.ts",
                "export const {{ name }}Model = getModelForClass({{ name }});",
                "// Append model here",
            ),
            Action::append(
                "src/app/_models/models.ts",
                "import { {{ name }} } from './{{ name }}';",
                "// Append import here",
            ),
        ]),
    )
    .prompt(Prompt::text("name", "Model name"));

    let mut registry = GeneratorRegistry::new();
    registry.register(route).unwrap();
    registry.register(model).unwrap();
    registry
}

fn route_answers(types: &[&str]) -> Answers {
    Answers::new()
        .with("dir", SelectedPath::from_original("src/app/dashboard"))
        .with("name", "dashboard")
        .with("types", types.iter().map(|t| t.to_string()).collect::<Vec<_>>())
}

#[tokio::test]
async fn test_route_writes_selected_groups_in_order() {
    let fixture = Fixture::new();
    let results = registry()
        .invoke("route", &route_answers(&["error", "page"]), &fixture.executor())
        .await
        .unwrap();

    let paths: Vec<&str> = results.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "src/app/dashboard/page.tsx",
            "src/app/dashboard/page.stories.tsx",
            "src/app/dashboard/error.tsx",
            "src/app/dashboard/error.stories.tsx",
        ]
    );
    assert!(results.iter().all(|r| r.outcome == Outcome::Created));
    assert_eq!(
        fixture.read("src/app/dashboard/page.tsx"),
        "export default function DashboardPage() {}\n"
    );
    assert!(!fixture.project.path().join("src/app/dashboard/layout.tsx").exists());
}

#[tokio::test]
async fn test_model_appends_are_ordered_and_idempotent() {
    let fixture = Fixture::new();
    let registry = registry();
    let answers = Answers::new().with("name", "User");

    let first = registry.invoke("model", &answers, &fixture.executor()).await.unwrap();
    assert_eq!(
        first.iter().map(|r| r.outcome).collect::<Vec<_>>(),
        vec![Outcome::Created, Outcome::Appended, Outcome::Appended]
    );

    let expected = "import { getModelForClass } from '@typegoose/typegoose';\n\
                    import { User } from './User';\n\
                    // Append import here\n\
                    \n\
                    export const UserModel = getModelForClass(User);\n\
                    // Append model here\n";
    assert_eq!(fixture.read("src/app/_models/models.ts"), expected);

    let second = registry.invoke("model", &answers, &fixture.executor()).await.unwrap();
    assert_eq!(
        second.iter().map(|r| r.outcome).collect::<Vec<_>>(),
        vec![Outcome::Skipped, Outcome::NoopDuplicate, Outcome::NoopDuplicate]
    );
    assert_eq!(fixture.read("src/app/_models/models.ts"), expected);
}

#[tokio::test]
async fn test_escaping_route_writes_nothing() {
    let fixture = Fixture::new();
    let answers = Answers::new()
        .with("dir", SelectedPath::from_original("../../etc"))
        .with("name", "passwd")
        .with("types", vec!["page".to_string()]);

    let err = registry()
        .invoke("route", &answers, &fixture.executor())
        .await
        .unwrap_err();

    assert!(matches!(err.root_cause(), Error::PathEscape { .. }));
    assert!(!fixture.project.path().join("../../etc/page.tsx").exists());
}

#[tokio::test]
async fn test_missing_answer_fails_before_writing() {
    let fixture = Fixture::new();
    let answers = Answers::new().with("name", "dashboard");

    let err = registry()
        .invoke("route", &answers, &fixture.executor())
        .await
        .unwrap_err();

    assert!(matches!(&err, Error::PlanFailed { generator, .. } if generator == "route"));
    assert!(matches!(err.root_cause(), Error::Planning { key } if key == "types"));
    assert!(fs::read_dir(fixture.project.path().join("src/app/dashboard"))
        .unwrap()
        .next()
        .is_none());
}
