mod common;

use std::collections::HashSet;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use common::{FakeClient, FakeEndpoint};
use tmq::client::{AddOptions, RemoveOptions, TodoList};
use tmq::error::{Error, Result};
use tmq::sources::{LocalSource, RemoteSource, Source, TagSource};
use tmq::task::{Tags, Task, TaskRecord, tags};

fn remote() -> (Arc<dyn Source>, Arc<FakeEndpoint>) {
    let endpoint = Arc::new(FakeEndpoint::default());
    let source = RemoteSource::with_client(
        "https://script.example/exec",
        Box::new(FakeClient(Arc::clone(&endpoint))),
    );
    (source, endpoint)
}

fn all_sources() -> Vec<(&'static str, Arc<dyn Source>)> {
    let local: Arc<dyn Source> = LocalSource::empty();
    let scoped: Arc<dyn Source> = TagSource::new(LocalSource::empty(), tags(["work"])).unwrap();
    let nested: Arc<dyn Source> = TagSource::new(
        TagSource::new(LocalSource::empty(), tags(["work"])).unwrap(),
        tags(["q3"]),
    )
    .unwrap();
    vec![
        ("local", local),
        ("remote", remote().0),
        ("tag", scoped),
        ("nested tag", nested),
    ]
}

fn title_set(source: &dyn Source) -> HashSet<String> {
    source
        .fetch()
        .unwrap()
        .iter()
        .map(|t| t.title().to_string())
        .collect()
}

#[test]
fn distinct_adds_are_all_fetched() {
    for (name, source) in all_sources() {
        for title in ["a", "b", "c"] {
            source.add_task(title, Tags::new()).unwrap();
        }
        let expected: HashSet<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        assert_eq!(title_set(source.as_ref()), expected, "source: {name}");
    }
}

#[test]
fn add_without_duplicates_is_idempotent() {
    for (name, source) in all_sources() {
        let todo = TodoList::new(source);
        let first = todo.add_task("x", Tags::new(), AddOptions::default()).unwrap();
        let before = todo.len().unwrap();
        let second = todo.add_task("x", Tags::new(), AddOptions::default()).unwrap();
        assert_eq!(first, second, "source: {name}");
        assert_eq!(todo.len().unwrap(), before, "source: {name}");
    }
}

#[test]
fn fetched_tasks_remove_themselves() {
    for (name, source) in all_sources() {
        let todo = TodoList::new(source);
        todo.add_tasks(["a", "b"], AddOptions::default()).unwrap();
        let a = todo.find_task_by_title("a", true).unwrap().unwrap();
        a.remove().unwrap();
        assert!(!todo.contains("a").unwrap(), "source: {name}");
        assert!(todo.contains("b").unwrap(), "source: {name}");
    }
}

#[test]
fn tag_view_round_trip() {
    let inner = LocalSource::empty();
    let view = TagSource::new(inner.clone(), tags(["work"])).unwrap();

    view.add_task("x", Tags::new()).unwrap();

    let visible = view.fetch().unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].title(), "x");
    assert!(visible[0].tags().is_empty());

    let raw = inner.fetch().unwrap();
    assert_eq!(raw[0].title(), "x");
    assert_eq!(raw[0].tags(), &tags(["work"]));
}

#[test]
fn tag_view_hides_unscoped_tasks() {
    let inner = LocalSource::empty();
    let view = TagSource::new(inner.clone(), tags(["work"])).unwrap();

    inner.add_task("personal", Tags::new()).unwrap();
    inner.add_task("other", tags(["home"])).unwrap();

    assert!(view.fetch().unwrap().is_empty());
    assert_eq!(inner.fetch().unwrap().len(), 2);
}

#[test]
fn tag_view_removal_is_symmetric() {
    let inner = LocalSource::empty();
    let view = TagSource::new(inner.clone(), tags(["work"])).unwrap();
    view.add_task("x", Tags::new()).unwrap();
    view.add_task("y", Tags::new()).unwrap();

    let x = view
        .fetch()
        .unwrap()
        .into_iter()
        .find(|t| t.title() == "x")
        .unwrap();
    x.remove().unwrap();

    assert_eq!(title_set(view.as_ref()), HashSet::from(["y".to_string()]));
    assert_eq!(inner.records(), vec![TaskRecord::new("y", tags(["work"]))]);
}

#[test]
fn two_views_share_one_backend() {
    let shared = LocalSource::empty();
    let work = TodoList::new(TagSource::new(shared.clone(), tags(["work"])).unwrap());
    let home = TodoList::new(TagSource::new(shared.clone(), tags(["home"])).unwrap());

    work.add_task("report", Tags::new(), AddOptions::default()).unwrap();
    home.add_task("laundry", Tags::new(), AddOptions::default()).unwrap();
    // Same title in another view is not a duplicate there.
    home.add_task("report", Tags::new(), AddOptions::default()).unwrap();

    assert_eq!(work.len().unwrap(), 1);
    assert_eq!(home.len().unwrap(), 2);
    assert_eq!(shared.records().len(), 3);

    work.remove_task("report", RemoveOptions::default()).unwrap();
    assert!(work.is_empty().unwrap());
    assert!(home.contains("report").unwrap());
}

#[test]
fn remote_protocol_flow() {
    let (source, endpoint) = remote();
    let todo = TodoList::new(source);

    todo.add_task("buy milk", Tags::new(), AddOptions::default()).unwrap();
    todo.add_task("Buy Milk", Tags::new(), AddOptions::default()).unwrap();
    assert_eq!(*endpoint.titles.lock(), vec!["buy milk"]);

    todo.remove_task("BUY MILK", RemoveOptions::default()).unwrap();
    assert!(endpoint.titles.lock().is_empty());

    assert_eq!(
        *endpoint.commands.lock(),
        vec!["todoGet", "taskAdd", "todoGet", "todoGet", "taskRemo"]
    );
}

#[test]
fn missing_task_policy() {
    let todo = TodoList::new(LocalSource::empty());
    assert!(todo.find_task_by_title("missing", false).unwrap().is_none());
    todo.remove_task("missing", RemoveOptions::default()).unwrap();

    let err = todo
        .remove_task(
            "missing",
            RemoveOptions {
                fail: true,
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, Error::TaskNotFound(_)));
}

#[test]
fn copy_between_backends() {
    let (remote_source, endpoint) = remote();
    let remote_list = TodoList::new(remote_source);
    let local_list = TodoList::new(LocalSource::new(["a", "b"]));

    remote_list
        .import_tasks(local_list.get_tasks().unwrap(), AddOptions::default())
        .unwrap();
    assert_eq!(*endpoint.titles.lock(), vec!["a", "b"]);
}

/// Minimal backend defined outside the crate.
struct TitleSource {
    titles: Mutex<Vec<String>>,
    me: Weak<dyn Source>,
}

impl TitleSource {
    fn new(titles: &[&str]) -> Arc<Self> {
        let titles = titles.iter().map(|t| t.to_string()).collect();
        Arc::new_cyclic(|me: &Weak<Self>| Self {
            titles: Mutex::new(titles),
            me: me.clone(),
        })
    }
}

impl Source for TitleSource {
    fn fetch(&self) -> Result<Vec<Task>> {
        Ok(self
            .titles
            .lock()
            .iter()
            .map(|title| Task::bound(TaskRecord::from(title.as_str()), &self.me))
            .collect())
    }

    fn add_task(&self, title: &str, _tags: Tags) -> Result<Task> {
        self.titles.lock().push(title.to_string());
        Ok(Task::bound(TaskRecord::from(title), &self.me))
    }

    fn remove_task(&self, task: &Task) -> Result<()> {
        self.titles.lock().retain(|t| t != task.title());
        Ok(())
    }
}

#[test]
fn external_source_tasks_remove_themselves() {
    let source = TitleSource::new(&["a", "b"]);
    let todo = TodoList::new(source.clone());

    let a = todo.find_task_by_title("a", true).unwrap().unwrap();
    assert!(a.is_bound());
    a.remove().unwrap();
    let strict = RemoveOptions {
        fail: true,
        ..Default::default()
    };
    todo.remove_task("b", strict).unwrap();

    assert!(source.titles.lock().is_empty());
}
