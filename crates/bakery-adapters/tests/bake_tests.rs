//! End-to-end bakes of the built-in template through the real adapters.

use std::path::{Path, PathBuf};

use bakery_adapters::{InMemoryStore, LocalFilesystem, MemoryFilesystem, SimpleRenderer};
use bakery_core::prelude::*;
use tempfile::TempDir;

const YEAR: i32 = 2026;

fn service(fs: &MemoryFilesystem) -> ScaffoldService {
    ScaffoldService::new(
        Box::new(InMemoryStore::with_builtin().unwrap()),
        Box::new(SimpleRenderer::new()),
        Box::new(fs.clone()),
    )
}

fn bake(ctx: &Context) -> (MemoryFilesystem, PathBuf) {
    let fs = MemoryFilesystem::new();
    service(&fs)
        .scaffold(ctx, &TemplateRef::named("python-package"), "out")
        .unwrap();
    (fs, Path::new("out").join(ctx.project_slug()))
}

fn read(fs: &MemoryFilesystem, root: &Path, rel: &str) -> String {
    fs.read_file(&root.join(rel))
        .unwrap_or_else(|| panic!("{rel} was not generated"))
}

fn has(fs: &MemoryFilesystem, root: &Path, rel: &str) -> bool {
    fs.read_file(&root.join(rel)).is_some()
}

fn pyproject(fs: &MemoryFilesystem, root: &Path) -> toml::Table {
    toml::from_str(&read(fs, root, "pyproject.toml")).expect("pyproject.toml must parse")
}

fn dev_dependencies(table: &toml::Table) -> &toml::Table {
    table["tool"]["poetry"]["group"]["dev"]["dependencies"]
        .as_table()
        .unwrap()
}

fn defaults() -> ContextBuilder {
    Context::builder(YEAR)
}

#[test]
fn bake_with_defaults() {
    let ctx = defaults().build().unwrap();
    let (fs, root) = bake(&ctx);

    assert_eq!(root, Path::new("out/python_boilerplate"));
    for rel in [
        "pyproject.toml",
        "tox.ini",
        "tasks.py",
        "mkdocs.yml",
        "README.md",
        "LICENSE",
        "AUTHORS.md",
        ".gitignore",
        "docs/index.md",
        "docs/authors.md",
        "src/python_boilerplate/__init__.py",
        "src/python_boilerplate/python_boilerplate.py",
        "src/python_boilerplate/cli.py",
        "tests/__init__.py",
        "tests/test_python_boilerplate.py",
    ] {
        assert!(has(&fs, &root, rel), "missing {rel}");
    }
    assert!(fs.exists(&root.join("src/python_boilerplate")));
}

#[test]
fn year_is_written_into_license() {
    let ctx = defaults().build().unwrap();
    let (fs, root) = bake(&ctx);
    assert!(read(&fs, &root, "LICENSE").contains("2026"));
}

#[test]
fn no_placeholder_survives_any_combination() {
    for license in License::ALL {
        for cli in [
            CliFramework::None,
            CliFramework::Click,
            CliFramework::Typer,
            CliFramework::Argparse,
        ] {
            for use_pytest in [true, false] {
                let ctx = defaults()
                    .license(*license)
                    .cli(cli)
                    .use_pytest(use_pytest)
                    .build()
                    .unwrap();
                let (fs, _) = bake(&ctx);
                for path in fs.list_files() {
                    let content = fs.read_file(&path).unwrap();
                    assert!(
                        !content.contains("{{"),
                        "{} leaks a placeholder for {license:?}/{cli:?}/{use_pytest}",
                        path.display()
                    );
                    assert!(!path.to_string_lossy().contains("{{"));
                }
            }
        }
    }
}

#[test]
fn special_characters_in_full_name_survive_every_quoted_embedding() {
    let cases = [
        (r#"name "quote" name"#, r#""name \"quote\" name""#),
        (r#"O'Brien "Bob""#, r#""O'Brien \"Bob\"""#),
        ("O'connor", r#""O'connor""#),
        (r"back\slash", r#""back\\slash""#),
        ("line1\nline2", r#""line1\nline2""#),
    ];
    let (default_fs, default_root) = bake(&defaults().build().unwrap());
    let default_mkdocs_lines = read(&default_fs, &default_root, "mkdocs.yml").lines().count();

    for (name, literal) in cases {
        let ctx = defaults().full_name(name).build().unwrap();
        let (fs, root) = bake(&ctx);

        let table = pyproject(&fs, &root);
        let authors = table["tool"]["poetry"]["authors"].as_array().unwrap();
        assert_eq!(
            authors[0].as_str().unwrap(),
            format!("{name} <{}>", ctx.email())
        );

        let init = read(&fs, &root, "src/python_boilerplate/__init__.py");
        assert!(
            init.lines().any(|l| l == format!("__author__ = {literal}")),
            "{name:?}: {init}"
        );

        let mkdocs = read(&fs, &root, "mkdocs.yml");
        assert!(
            mkdocs.lines().any(|l| l == format!("site_author: {literal}")),
            "{name:?}: {mkdocs}"
        );
        assert!(!mkdocs.contains("\"\"\""), "{name:?}: {mkdocs}");
        assert_eq!(mkdocs.lines().count(), default_mkdocs_lines, "{name:?}");
    }
}

#[test]
fn python_sources_fit_flake8_line_limit() {
    for cli in CliFramework::ALL {
        for use_pytest in [true, false] {
            for formatter in Formatter::ALL {
                let ctx = defaults()
                    .cli(*cli)
                    .use_pytest(use_pytest)
                    .formatter(*formatter)
                    .build()
                    .unwrap();
                let (fs, _) = bake(&ctx);
                for path in fs.list_files() {
                    if path.extension().is_none_or(|ext| ext != "py") {
                        continue;
                    }
                    let content = fs.read_file(&path).unwrap();
                    for (n, line) in content.lines().enumerate() {
                        assert!(
                            line.chars().count() <= 79,
                            "{}:{} is {} characters for {cli:?}",
                            path.display(),
                            n + 1,
                            line.chars().count()
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn selecting_license_writes_matching_text() {
    let expectations = [
        (License::Mit, "MIT License"),
        (
            License::Bsd3Clause,
            "Redistributions of source code must retain the above copyright notice, this",
        ),
        (License::Isc, "ISC License"),
        (
            License::Apache2,
            "Licensed under the Apache License, Version 2.0",
        ),
        (License::Gpl3Only, "GNU GENERAL PUBLIC LICENSE"),
    ];

    for (license, marker) in expectations {
        let ctx = defaults().license(license).build().unwrap();
        let (fs, root) = bake(&ctx);

        assert!(read(&fs, &root, "LICENSE").contains(marker));
        let table = pyproject(&fs, &root);
        assert_eq!(
            table["tool"]["poetry"]["license"].as_str(),
            Some(license.as_str())
        );
    }
}

#[test]
fn not_open_source_drops_license() {
    let ctx = defaults().license(License::NotOpenSource).build().unwrap();
    let (fs, root) = bake(&ctx);

    assert!(has(&fs, &root, "pyproject.toml"));
    assert!(!has(&fs, &root, "LICENSE"));
    assert!(!read(&fs, &root, "README.md").contains("License"));
    assert!(pyproject(&fs, &root)["tool"]["poetry"].get("license").is_none());
}

#[test]
fn without_author_file() {
    let ctx = defaults().create_author_file(false).build().unwrap();
    let (fs, root) = bake(&ctx);

    assert!(!has(&fs, &root, "AUTHORS.md"));
    assert!(!has(&fs, &root, "docs/authors.md"));
    assert!(!read(&fs, &root, "mkdocs.yml").contains("authors.md"));
    assert!(!read(&fs, &root, "docs/index.md").contains("authors.md"));
}

#[test]
fn pytest_and_unittest_styles() {
    let ctx = defaults().use_pytest(true).build().unwrap();
    let (fs, root) = bake(&ctx);
    let tests = read(&fs, &root, "tests/test_python_boilerplate.py");
    assert!(tests.contains("import pytest"));
    assert!(tests.contains("def test_command_line_interface():"));
    assert!(dev_dependencies(&pyproject(&fs, &root)).contains_key("pytest"));

    let ctx = defaults().use_pytest(false).build().unwrap();
    let (fs, root) = bake(&ctx);
    let tests = read(&fs, &root, "tests/test_python_boilerplate.py");
    assert!(tests.contains("import unittest"));
    assert!(!tests.contains("import pytest"));
    assert!(tests.contains("class TestPythonBoilerplate(unittest.TestCase):"));
    assert!(tests.contains("    def test_command_line_interface(self):"));
    assert!(!dev_dependencies(&pyproject(&fs, &root)).contains_key("pytest"));
}

#[test]
fn console_script_files_follow_cli_choice() {
    for cli in [
        CliFramework::None,
        CliFramework::Click,
        CliFramework::Typer,
        CliFramework::Argparse,
    ] {
        let ctx = defaults().cli(cli).build().unwrap();
        let (fs, root) = bake(&ctx);
        let raw = read(&fs, &root, "pyproject.toml");

        if cli.is_enabled() {
            assert!(has(&fs, &root, "src/python_boilerplate/cli.py"), "{cli:?}");
            assert!(raw.contains("[tool.poetry.scripts]"), "{cli:?}");
        } else {
            assert!(!has(&fs, &root, "src/python_boilerplate/cli.py"));
            assert!(!raw.contains("[tool.poetry.scripts]"));
        }
    }
}

#[test]
fn typer_cli_exposes_app() {
    let ctx = defaults().cli(CliFramework::Typer).use_pytest(true).build().unwrap();
    let (fs, root) = bake(&ctx);

    let module = read(&fs, &root, "src/python_boilerplate/cli.py");
    assert!(module.contains("app = typer.Typer()"));
    assert!(module.contains(
        "\"Replace this message by putting your code into \"\n        \"python_boilerplate.cli.main\""
    ));

    let table = pyproject(&fs, &root);
    assert_eq!(
        table["tool"]["poetry"]["scripts"]["python_boilerplate"].as_str(),
        Some("python_boilerplate.cli:app")
    );
    assert!(table["tool"]["poetry"]["dependencies"]
        .as_table()
        .unwrap()
        .contains_key("typer"));

    let tests = read(&fs, &root, "tests/test_python_boilerplate.py");
    assert!(tests.contains("from typer.testing import CliRunner"));
    assert!(tests.contains("runner.invoke(cli.app)"));
}

#[test]
fn argparse_has_no_cli_test() {
    let ctx = defaults().cli(CliFramework::Argparse).build().unwrap();
    let (fs, root) = bake(&ctx);

    assert!(read(&fs, &root, "src/python_boilerplate/cli.py").contains("argparse.ArgumentParser"));
    let tests = read(&fs, &root, "tests/test_python_boilerplate.py");
    assert!(!tests.contains("CliRunner"));
    assert!(!tests.contains("test_command_line_interface"));
}

#[test]
fn formatter_choice_sets_dependency_and_task() {
    let cases = [
        (Formatter::Black, Some("black"), Some("black --check")),
        (Formatter::RuffFormat, Some("ruff"), Some("ruff format --check")),
        (Formatter::None, None, None),
    ];

    for (formatter, dependency, command) in cases {
        let ctx = defaults().formatter(formatter).build().unwrap();
        let (fs, root) = bake(&ctx);
        let table = pyproject(&fs, &root);
        let dev = dev_dependencies(&table);
        let tasks = read(&fs, &root, "tasks.py");

        assert_eq!(dev.contains_key("black"), dependency == Some("black"));
        assert_eq!(dev.contains_key("ruff"), dependency == Some("ruff"));
        match command {
            Some(cmd) => assert_eq!(tasks.matches(cmd).count(), 1),
            None => {
                assert!(!tasks.contains("black --check"));
                assert!(!tasks.contains("ruff format"));
            }
        }
    }
}

#[test]
fn end_to_end_example() {
    let ctx = defaults()
        .license(License::Mit)
        .cli(CliFramework::None)
        .formatter(Formatter::None)
        .create_author_file(true)
        .build()
        .unwrap();
    let (fs, root) = bake(&ctx);

    assert!(read(&fs, &root, "LICENSE").contains("MIT License"));
    assert!(!has(&fs, &root, "src/python_boilerplate/cli.py"));
    assert!(!read(&fs, &root, "pyproject.toml").contains("[tool.poetry.scripts]"));
    let table = pyproject(&fs, &root);
    let dev = dev_dependencies(&table);
    assert!(!dev.contains_key("black") && !dev.contains_key("ruff"));
    assert!(has(&fs, &root, "AUTHORS.md"));
}

#[test]
fn rendering_is_deterministic() {
    let ctx = defaults()
        .project_name("Data Tools")
        .cli(CliFramework::Click)
        .build()
        .unwrap();
    let (first, _) = bake(&ctx);
    let (second, _) = bake(&ctx);

    let files = first.list_files();
    assert_eq!(files, second.list_files());
    for path in files {
        assert_eq!(first.read_file(&path), second.read_file(&path));
    }
}

#[test]
fn existing_project_root_is_rejected() {
    let ctx = defaults().build().unwrap();
    let fs = MemoryFilesystem::new();
    let svc = service(&fs);
    let reference = TemplateRef::named("python-package");

    svc.scaffold(&ctx, &reference, "out").unwrap();
    let before = fs.list_files();

    let err = svc.scaffold(&ctx, &reference, "out").unwrap_err();
    assert!(err.to_string().contains("already exists"));
    assert_eq!(fs.list_files(), before);
}

#[test]
fn bakes_onto_disk() {
    let dir = TempDir::new().unwrap();
    let ctx = defaults().project_name("Disk Project").build().unwrap();
    let svc = ScaffoldService::new(
        Box::new(InMemoryStore::with_builtin().unwrap()),
        Box::new(SimpleRenderer::new()),
        Box::new(LocalFilesystem::new()),
    );

    let structure = svc
        .scaffold(&ctx, &"python-package@1.0.0".parse().unwrap(), dir.path())
        .unwrap();

    let root = dir.path().join("disk_project");
    assert_eq!(structure.root(), root);
    let init = std::fs::read_to_string(root.join("src/disk_project/__init__.py")).unwrap();
    assert!(init.contains("__version__ = \"0.1.0\""));
    assert!(root.join("docs/usage.md").is_file());
}

fn scripts_template_dir() -> TempDir {
    let templates = TempDir::new().unwrap();
    let dir = templates.path().join("scripts");
    std::fs::create_dir_all(dir.join("bin")).unwrap();
    std::fs::write(
        dir.join("template.toml"),
        "[template]\nid = \"scripts\"\nversion = \"1.0.0\"\n\n[metadata]\nname = \"Scripts\"\n\n\
         [[files]]\npath = \"bin/run.sh\"\nexecutable = true\n",
    )
    .unwrap();
    std::fs::write(dir.join("bin/run.sh"), "#!/bin/sh\necho {{PROJECT_SLUG}}\n").unwrap();
    std::fs::write(dir.join("README.md"), "# {{PROJECT_NAME}}\n").unwrap();
    templates
}

#[test]
fn manifest_executable_flag_reaches_the_filesystem() {
    let templates = scripts_template_dir();
    let ctx = defaults().build().unwrap();
    let fs = MemoryFilesystem::new();
    let svc = ScaffoldService::new(
        Box::new(InMemoryStore::with_templates_dir(Some(templates.path())).unwrap()),
        Box::new(SimpleRenderer::new()),
        Box::new(fs.clone()),
    );

    svc.scaffold(&ctx, &TemplateRef::named("scripts"), "out").unwrap();

    let root = Path::new("out/python_boilerplate");
    assert_eq!(
        fs.read_file(&root.join("bin/run.sh")).as_deref(),
        Some("#!/bin/sh\necho python_boilerplate\n")
    );
    assert!(fs.is_executable(&root.join("bin/run.sh")));
    assert!(!fs.is_executable(&root.join("README.md")));
}

#[cfg(unix)]
#[test]
fn manifest_executable_flag_sets_mode_on_disk() {
    use std::os::unix::fs::PermissionsExt;

    let templates = scripts_template_dir();
    let out = TempDir::new().unwrap();
    let ctx = defaults().build().unwrap();
    let svc = ScaffoldService::new(
        Box::new(InMemoryStore::with_templates_dir(Some(templates.path())).unwrap()),
        Box::new(SimpleRenderer::new()),
        Box::new(LocalFilesystem::new()),
    );

    svc.scaffold(&ctx, &TemplateRef::named("scripts"), out.path()).unwrap();

    let root = out.path().join("python_boilerplate");
    let mode = |rel: &str| {
        std::fs::metadata(root.join(rel))
            .unwrap()
            .permissions()
            .mode()
    };
    assert_ne!(mode("bin/run.sh") & 0o111, 0);
    assert_eq!(mode("README.md") & 0o111, 0);
}

#[test]
fn preview_writes_nothing() {
    let ctx = defaults().build().unwrap();
    let fs = MemoryFilesystem::new();

    let structure = service(&fs)
        .preview(&ctx, &TemplateRef::named("python-package"), "out")
        .unwrap();

    assert!(structure.file_count() > 10);
    assert!(fs.list_files().is_empty());
}
