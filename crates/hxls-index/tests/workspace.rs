use std::fs;

use camino::Utf8Path;
use camino::Utf8PathBuf;
use hxls_index::HandlerIndex;
use hxls_index::IndexError;
use hxls_index::TagKind;
use tempfile::TempDir;

const VIEWS: &str = r#"
from hx_requests.hx_requests import BaseHxRequest, ModalHxRequest

class NotesCount(BaseHxRequest):
    name = "notes_count"

class EditModal(ModalHxRequest):
    name = "edit_modal"
    GET_template = "forms/edit.html"
"#;

const LIST: &str = r"
{% load hx_tags %}
<div>
    <span>{{ count }}</span>
    <button {% hx_post 'notes_count' %}>Refresh</button>
    <button {% hx_vals hx_request_name='edit_modal' object=item %}>Edit</button>
    <button {% hx_post 'undefined_action' %}>Broken</button>
</div>
";

const DETAIL: &str = r"
<div>
    <button {% hx_post 'edit_modal' object=item %}>Edit</button>
</div>
";

struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    fn new() -> Self {
        Self::create(None)
    }

    /// A workspace rooted at `<tmp>/<parent>/site`.
    fn nested_under(parent: &str) -> Self {
        Self::create(Some(parent))
    }

    fn create(parent: Option<&str>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let base = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let root = match parent {
            Some(parent) => base.join(parent).join("site"),
            None => base,
        };

        let handlers = root.join("app/hx_requests");
        fs::create_dir_all(&handlers).unwrap();
        fs::write(handlers.join("views.py"), VIEWS).unwrap();

        let templates = root.join("app/templates/app");
        fs::create_dir_all(&templates).unwrap();
        fs::write(templates.join("list.html"), LIST).unwrap();
        fs::write(templates.join("detail.html"), DETAIL).unwrap();

        // Neither a handler module nor a template.
        fs::write(root.join("app/views.py"), VIEWS.replace("notes_count", "hidden")).unwrap();

        Self { _dir: dir, root }
    }

    fn views(&self) -> Utf8PathBuf {
        self.root.join("app/hx_requests/views.py")
    }

    fn list(&self) -> Utf8PathBuf {
        self.root.join("app/templates/app/list.html")
    }

    fn detail(&self) -> Utf8PathBuf {
        self.root.join("app/templates/app/detail.html")
    }

    fn index(&self) -> HandlerIndex {
        let index = HandlerIndex::new();
        index.build_full_index(&self.root).unwrap();
        index
    }
}

#[test]
fn builds_full_index() {
    let workspace = Workspace::new();
    let index = HandlerIndex::new();
    let stats = index.build_full_index(&workspace.root).unwrap();

    assert_eq!(stats.source_files, 1);
    assert_eq!(stats.template_files, 2);
    assert_eq!(stats.skipped_files, 0);
    assert_eq!(stats.definitions, 2);
    assert_eq!(stats.usages, 4);

    assert!(index.get_definition("notes_count").is_some());
    assert!(index.get_definition("edit_modal").is_some());
    assert!(index.get_definition("nonexistent").is_none());
    assert!(index.get_definition("hidden").is_none());
}

#[test]
fn definition_details() {
    let workspace = Workspace::new();
    let definition = workspace.index().get_definition("edit_modal").unwrap();

    assert_eq!(definition.class_name, "EditModal");
    assert_eq!(definition.base_classes, vec!["ModalHxRequest"]);
    assert_eq!(definition.get_template.as_deref(), Some("forms/edit.html"));
    assert_eq!(definition.file, workspace.views());
    assert_eq!(definition.line_number, 7);
}

#[test]
fn all_definition_names() {
    let workspace = Workspace::new();
    let names = workspace.index().get_all_definition_names();

    assert_eq!(
        names.into_iter().collect::<Vec<_>>(),
        vec!["edit_modal", "notes_count"]
    );
}

#[test]
fn usages_across_templates() {
    let workspace = Workspace::new();
    let usages = workspace.index().get_usages("edit_modal");

    assert_eq!(usages.len(), 2);
    // Walk order is sorted, so detail.html is processed before list.html.
    assert_eq!(usages[0].file, workspace.detail());
    assert_eq!(usages[0].tag_type, TagKind::HxPost);
    assert_eq!(usages[1].file, workspace.list());
    assert_eq!(usages[1].tag_type, TagKind::HxVals);
    assert_eq!(usages[1].line_number, 6);
}

#[test]
fn usages_empty_for_unknown() {
    let workspace = Workspace::new();
    assert!(workspace.index().get_usages("nonexistent").is_empty());
}

#[test]
fn undefined_usages() {
    let workspace = Workspace::new();
    let undefined = workspace.index().find_undefined_usages();

    assert_eq!(undefined.len(), 1);
    assert_eq!(undefined[0].name, "undefined_action");
    assert_eq!(undefined[0].file, workspace.list());
    assert_eq!(undefined[0].line_number, 7);
}

#[test]
fn no_unused_definitions() {
    let workspace = Workspace::new();
    assert!(workspace.index().find_unused_definitions().is_empty());
}

#[test]
fn update_python_file_replaces_definitions() {
    let workspace = Workspace::new();
    let index = workspace.index();

    index.update_file(
        &workspace.views(),
        r#"
from hx_requests.hx_requests import BaseHxRequest

class NewRequest(BaseHxRequest):
    name = "new_request"
"#,
    );

    assert!(index.get_definition("notes_count").is_none());
    assert!(index.get_definition("edit_modal").is_none());
    assert!(index.get_definition("new_request").is_some());

    let unused: Vec<_> = index
        .find_unused_definitions()
        .into_iter()
        .map(|d| d.name)
        .collect();
    assert_eq!(unused, vec!["new_request"]);
}

#[test]
fn update_template_file_replaces_usages() {
    let workspace = Workspace::new();
    let index = workspace.index();
    assert_eq!(index.get_usages("edit_modal").len(), 2);

    index.update_file(
        &workspace.list(),
        r"
<div>
    <button {% hx_post 'edit_modal' %}>Edit 1</button>
    <button {% hx_post 'edit_modal' %}>Edit 2</button>
    <button {% hx_post 'edit_modal' %}>Edit 3</button>
</div>
",
    );

    let usages = index.get_usages("edit_modal");
    assert_eq!(usages.len(), 4);
    assert_eq!(usages[0].file, workspace.detail());
    assert!(usages[1..].iter().all(|u| u.file == workspace.list()));
    assert!(index.find_undefined_usages().is_empty());
}

#[test]
fn remove_file_drops_definitions() {
    let workspace = Workspace::new();
    let index = workspace.index();

    index.remove_file(&workspace.views());

    assert!(index.get_definition("notes_count").is_none());
    assert!(index.get_definition("edit_modal").is_none());
    let undefined: Vec<_> = index
        .find_undefined_usages()
        .into_iter()
        .map(|u| u.name)
        .collect();
    assert_eq!(
        undefined,
        vec!["edit_modal", "notes_count", "edit_modal", "undefined_action"]
    );
}

#[test]
fn remove_template_drops_usages() {
    let workspace = Workspace::new();
    let index = workspace.index();

    index.remove_file(&workspace.list());

    assert!(index.get_usages("notes_count").is_empty());
    assert_eq!(index.get_usages("edit_modal").len(), 1);
    let unused: Vec<_> = index
        .find_unused_definitions()
        .into_iter()
        .map(|d| d.name)
        .collect();
    assert_eq!(unused, vec!["notes_count"]);
}

#[test]
fn definitions_in_file() {
    let workspace = Workspace::new();
    let index = workspace.index();

    let mut names: Vec<_> = index
        .get_definitions_in_file(&workspace.views())
        .into_iter()
        .map(|d| d.name)
        .collect();
    names.sort();
    assert_eq!(names, vec!["edit_modal", "notes_count"]);
}

#[test]
fn usages_in_file() {
    let workspace = Workspace::new();
    let index = workspace.index();

    let names: Vec<_> = index
        .get_usages_in_file(&workspace.list())
        .into_iter()
        .map(|u| u.name)
        .collect();
    assert_eq!(names, vec!["notes_count", "edit_modal", "undefined_action"]);
}

#[test]
fn update_unknown_file_inserts_fresh() {
    let workspace = Workspace::new();
    let index = workspace.index();
    let new_template = workspace.root.join("app/templates/app/new.html");

    index.update_file(&new_template, "{% hx_get 'notes_count' %}");

    assert_eq!(index.get_usages("notes_count").len(), 2);
    assert!(index.indexed_files().contains(&new_template));
}

#[test]
fn duplicate_names_last_wins_and_fall_back() {
    let workspace = Workspace::new();
    let other = workspace.root.join("billing/hx_requests.py");
    fs::create_dir_all(other.parent().unwrap()).unwrap();
    fs::write(
        &other,
        "class Other(BaseHxRequest):\n    name = 'edit_modal'\n",
    )
    .unwrap();

    let index = workspace.index();
    // app/... sorts before billing/..., so billing wins.
    assert_eq!(index.get_definition("edit_modal").unwrap().file, other);

    let duplicates = index.find_duplicate_definitions();
    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].name, "edit_modal");
    assert_eq!(duplicates[0].shadowed[0].file, workspace.views());

    index.remove_file(&other);
    assert_eq!(
        index.get_definition("edit_modal").unwrap().file,
        workspace.views()
    );
    assert!(index.find_duplicate_definitions().is_empty());
}

#[test]
fn rebuild_replaces_previous_state() {
    let workspace = Workspace::new();
    let index = workspace.index();
    index.update_file(
        Utf8Path::new("elsewhere/hx_requests.py"),
        "class Stray(BaseHxRequest):\n    name = 'stray'\n",
    );
    assert!(index.get_definition("stray").is_some());

    index.build_full_index(&workspace.root).unwrap();
    assert!(index.get_definition("stray").is_none());
    assert_eq!(index.len(), 3);
}

#[test]
fn gitignored_files_are_skipped() {
    let workspace = Workspace::new();
    fs::write(workspace.root.join(".ignore"), "build/\n").unwrap();
    let build = workspace.root.join("build");
    fs::create_dir_all(&build).unwrap();
    fs::write(build.join("copy.html"), "{% hx_post 'ghost' %}").unwrap();

    let index = workspace.index();
    assert!(index.get_usages("ghost").is_empty());
}

#[test]
fn inaccessible_root_is_an_error() {
    let workspace = Workspace::new();
    let missing = workspace.root.join("does-not-exist");

    let error = HandlerIndex::new().build_full_index(&missing).unwrap_err();
    assert!(matches!(error, IndexError::RootNotFound { .. }));
    assert!(error.to_string().contains("does-not-exist"));
}

#[test]
fn unreadable_file_is_skipped() {
    let workspace = Workspace::new();
    let broken = workspace.root.join("app/templates/app/broken.html");
    fs::write(&broken, b"\xff{% hx_post 'x' %}").unwrap();

    let index = HandlerIndex::new();
    let stats = index.build_full_index(&workspace.root).unwrap();

    assert_eq!(stats.skipped_files, 1);
    assert_eq!(stats.source_files, 1);
    assert_eq!(stats.template_files, 2);
    assert!(!index.indexed_files().contains(&broken));
    assert!(index.get_usages("x").is_empty());
    assert!(index.get_definition("notes_count").is_some());
    assert_eq!(index.get_usages("edit_modal").len(), 2);
}

#[test]
fn markers_above_root_do_not_select_modules() {
    let workspace = Workspace::nested_under("hx_requests");
    let plain_views = workspace.root.join("app/views.py");

    let index = HandlerIndex::new();
    let stats = index.build_full_index(&workspace.root).unwrap();

    assert_eq!(stats.source_files, 1);
    assert!(!index.indexed_files().contains(&plain_views));
    assert!(index.get_definition("hidden").is_none());
    assert!(index.find_duplicate_definitions().is_empty());

    index.update_file(&plain_views, "class Late(BaseHxRequest):\n    name = 'late'\n");
    assert!(index.get_definition("late").is_none());
    assert_eq!(index.len(), 3);
}
