use std::time::Duration;

use criterion::measurement::WallTime;
use criterion::{
    black_box, criterion_group, criterion_main, BenchmarkGroup, BenchmarkId, Criterion,
};
use jsoncast::{
    CastingLevel, ClassDef, CollectionShape, Definition, Model, Obj, ParseOptions, Reflector,
    Value,
};

#[derive(Debug, Clone, PartialEq, Default)]
struct Repo {
    id: i64,
    name: String,
    stars: i32,
    private: bool,
    topics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
struct Node {
    name: String,
    value: i64,
    children: Vec<Node>,
}

fn definition() -> Definition {
    let mut model = Model::basic("bench");
    let long = model.lookup("long").unwrap();
    let int = model.lookup("int").unwrap();
    let string = model.lookup("String").unwrap();
    let boolean = model.lookup("boolean").unwrap();

    let mut repo = ClassDef::new(
        "Repo",
        Reflector::<Repo>::new()
            .default_constructor()
            .setter("setId", |r: &mut Repo, id: i64| r.id = id)
            .getter("getId", |r: &Repo| r.id)
            .setter("setName", |r: &mut Repo, name: String| r.name = name)
            .getter("getName", |r: &Repo| r.name.clone())
            .setter("setStars", |r: &mut Repo, stars: i32| r.stars = stars)
            .getter("getStars", |r: &Repo| r.stars)
            .setter("setPrivate", |r: &mut Repo, private: bool| r.private = private)
            .getter("isPrivate", |r: &Repo| r.private)
            .setter("setTopics", |r: &mut Repo, topics: Vec<String>| r.topics = topics)
            .getter("getTopics", |r: &Repo| r.topics.clone())
            .finish(),
    );
    repo.add_field("id", &long)
        .add_field("name", &string)
        .add_field("stars", &int)
        .add_field("private", &boolean)
        .add_collection("topics", &string, CollectionShape::List);
    model.add(repo);

    let mut node = ClassDef::new(
        "Node",
        Reflector::<Node>::new()
            .default_constructor()
            .setter("setName", |n: &mut Node, name: String| n.name = name)
            .getter("getName", |n: &Node| n.name.clone())
            .setter("setValue", |n: &mut Node, value: i64| n.value = value)
            .getter("getValue", |n: &Node| n.value)
            .setter("setChildren", |n: &mut Node, children: Vec<Obj<Node>>| {
                n.children = children.into_iter().map(Obj::into_inner).collect();
            })
            .getter("getChildren", |n: &Node| {
                n.children.iter().cloned().map(Value::object).collect::<Vec<_>>()
            })
            .finish(),
    );
    node.add_field("name", &string)
        .add_field("value", &long)
        .add_field_named("children", "Node", CollectionShape::List);
    model.add(node);

    Definition::new(model, CastingLevel::Never).unwrap()
}

fn make_repos(count: usize) -> Value {
    let repos = (0..count)
        .map(|i| {
            Value::object(Repo {
                id: i as i64 * 7919,
                name: format!("repo-{i}"),
                stars: (i % 5000) as i32,
                private: i % 3 == 0,
                topics: vec![format!("topic-{}", i % 11), format!("lang-{}", i % 4)],
            })
        })
        .collect();
    Value::List(repos)
}

fn make_tree(depth: usize, width: usize, seed: i64) -> Node {
    let children = if depth == 0 {
        Vec::new()
    } else {
        (0..width)
            .map(|i| make_tree(depth - 1, width, seed * 31 + i as i64))
            .collect()
    };
    Node {
        name: format!("node-{seed}"),
        value: seed - 500,
        children,
    }
}

fn bench_parse_build(
    group: &mut BenchmarkGroup<'_, WallTime>,
    definition: &Definition,
    name: &str,
    root: &str,
    text: &str,
) {
    group.throughput(criterion::Throughput::Bytes(text.len() as u64));
    group.bench_function(BenchmarkId::new("parse", name), |b| {
        b.iter(|| {
            let item = jsoncast::parse_str(black_box(text), definition, Some(root)).unwrap();
            black_box(item);
        });
    });
    group.bench_function(BenchmarkId::new("parse_build", name), |b| {
        b.iter(|| {
            let value = jsoncast::build_str(black_box(text), definition, Some(root)).unwrap();
            black_box(value);
        });
    });
}

fn bench_write(
    group: &mut BenchmarkGroup<'_, WallTime>,
    definition: &Definition,
    name: &str,
    root: &str,
    value: &Value,
) {
    group.bench_function(BenchmarkId::new("write", name), |b| {
        b.iter(|| {
            let text = jsoncast::to_string(black_box(value), definition, Some(root)).unwrap();
            black_box(text);
        });
    });
}

fn criterion_config() -> Criterion {
    if std::env::var("JSONCAST_BENCH_MINIMAL").is_ok() {
        Criterion::default()
            .warm_up_time(Duration::from_secs(0))
            .measurement_time(Duration::from_millis(10))
            .sample_size(10)
            .nresamples(1)
    } else {
        Criterion::default()
    }
}

fn criterion_benchmark(c: &mut Criterion) {
    let definition = definition();

    let repos = make_repos(2000);
    let repos_text = jsoncast::to_string(&repos, &definition, Some("Repo")).unwrap();

    let tree = Value::object(make_tree(5, 4, 1));
    let tree_text = jsoncast::to_string(&tree, &definition, Some("Node")).unwrap();

    let mut read = c.benchmark_group("read");
    bench_parse_build(&mut read, &definition, "repos", "Repo", &repos_text);
    bench_parse_build(&mut read, &definition, "tree", "Node", &tree_text);
    read.finish();

    let mut write = c.benchmark_group("write");
    bench_write(&mut write, &definition, "repos", "Repo", &repos);
    bench_write(&mut write, &definition, "tree", "Node", &tree);
    write.finish();

    let documents: Vec<String> = (0..64).map(|_| tree_text.clone()).collect();
    let mut batch = c.benchmark_group("batch");
    batch.bench_function("build_all", |b| {
        b.iter(|| {
            let results = jsoncast::parallel::build_all(
                black_box(&documents),
                &definition,
                Some("Node"),
                &ParseOptions::new(),
            );
            black_box(results);
        });
    });
    batch.finish();
}

criterion_group! {
    name = benches;
    config = criterion_config();
    targets = criterion_benchmark
}
criterion_main!(benches);
