#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};

use jsoncast::{
    CastingLevel, ClassDef, CollectionShape, Definition, InterfaceDef, MapDef, MapValue, Model,
    NamedVariant, Reflector, Validation, Value,
};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Circle {
    pub radius: i32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Square {
    pub side: i32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Layer {
    Back,
    Front,
}

impl NamedVariant for Layer {
    fn by_name(name: &str) -> Option<Self> {
        match name {
            "BACK" => Some(Layer::Back),
            "FRONT" => Some(Layer::Front),
            _ => None,
        }
    }

    fn name(&self) -> &str {
        match self {
            Layer::Back => "BACK",
            Layer::Front => "FRONT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Drawing {
    pub title: Option<String>,
    pub main: Value,
    pub shapes: Vec<Value>,
    pub sizes: Vec<i32>,
    pub visible: bool,
    pub labels: Option<MapValue>,
    pub layer: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub name: String,
    pub age: i32,
    pub email: Option<String>,
    pub code: String,
}

impl Person {
    pub fn new(name: &str, age: i32) -> Self {
        Self {
            name: name.to_string(),
            age,
            email: None,
            code: String::new(),
        }
    }
}

/// Circles and squares behind a `Shape` interface, a drawing holding them,
/// and a person built through a two-argument constructor.
pub fn model() -> Model {
    let mut model = Model::basic("drawing");
    let int = model.lookup("int").unwrap();
    let string = model.lookup("String").unwrap();
    let boolean = model.lookup("boolean").unwrap();

    let mut circle = ClassDef::new(
        "Circle",
        Reflector::<Circle>::new()
            .default_constructor()
            .setter("setRadius", |c: &mut Circle, radius: i32| c.radius = radius)
            .getter("getRadius", |c: &Circle| c.radius)
            .finish(),
    );
    circle.add_field("radius", &int);
    let circle = model.add(circle);

    let mut square = ClassDef::new(
        "Square",
        Reflector::<Square>::new()
            .default_constructor()
            .setter("setSide", |s: &mut Square, side: i32| s.side = side)
            .getter("getSide", |s: &Square| s.side)
            .finish(),
    );
    square.add_field("side", &int);
    let square = model.add(square);

    let shape = model.add(InterfaceDef::new("Shape").member(&circle).member(&square));
    let labels = model.add(MapDef::new("Labels", &string, CollectionShape::None));
    let layer = model.add_enum_by_name::<Layer>("Layer");

    let mut drawing = ClassDef::new(
        "Drawing",
        Reflector::<Drawing>::new()
            .default_constructor()
            .setter("setTitle", |d: &mut Drawing, title: Option<String>| d.title = title)
            .getter("getTitle", |d: &Drawing| d.title.clone())
            .setter("setMain", |d: &mut Drawing, main: Value| d.main = main)
            .getter("getMain", |d: &Drawing| d.main.clone())
            .setter("setShapes", |d: &mut Drawing, shapes: Vec<Value>| d.shapes = shapes)
            .getter("getShapes", |d: &Drawing| Value::List(d.shapes.clone()))
            .setter("setSizes", |d: &mut Drawing, sizes: Vec<i32>| d.sizes = sizes)
            .getter("getSizes", |d: &Drawing| d.sizes.clone())
            .setter("setVisible", |d: &mut Drawing, visible: bool| d.visible = visible)
            .getter("isVisible", |d: &Drawing| d.visible)
            .setter("setLabels", |d: &mut Drawing, labels: Option<MapValue>| d.labels = labels)
            .getter("getLabels", |d: &Drawing| d.labels.clone())
            .setter("setLayer", |d: &mut Drawing, layer: Value| d.layer = layer)
            .getter("getLayer", |d: &Drawing| d.layer.clone())
            .finish(),
    );
    drawing
        .add_field("title", &string)
        .add_field("main", &shape)
        .add_collection("shapes", &shape, CollectionShape::List)
        .add_collection("sizes", &int, CollectionShape::Array)
        .add_field("visible", &boolean)
        .add_field("labels", &labels)
        .add_field("layer", &layer);
    model.add(drawing);

    let mut person = ClassDef::new(
        "Person",
        Reflector::<Person>::new()
            .constructor2(|name: String, nickname: String| {
                let mut person = Person::new(&name, 0);
                person.code = nickname;
                person
            })
            .constructor2(|name: String, age: i32| Person::new(&name, age))
            .setter("setEmail", |p: &mut Person, email: Option<String>| p.email = email)
            .getter("getEmail", |p: &Person| p.email.clone())
            .setter("setCode", |p: &mut Person, code: String| p.code = code.to_uppercase())
            .getter("getCode", |p: &Person| p.code.clone())
            .getter("getName", |p: &Person| p.name.clone())
            .getter("getAge", |p: &Person| p.age)
            .finish(),
    );
    person
        .add_cparam("name", &string)
        .add_cparam("age", &int)
        .add_field("email", &string)
        .add_validated("code", &string, Validation::Equals);
    model.add(person);
    model
}

pub fn definition(casting_level: CastingLevel) -> Definition {
    Definition::new(model(), casting_level).unwrap()
}

pub fn circle(radius: i32) -> Value {
    Value::object(Circle { radius })
}

pub fn square(side: i32) -> Value {
    Value::object(Square { side })
}

/// Shared buffer that a `tracing_subscriber` fmt layer writes into.
#[derive(Clone, Default)]
pub struct LogSink(Arc<Mutex<Vec<u8>>>);

impl LogSink {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `f` with a subscriber capturing every event at INFO and above.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let sink = LogSink::default();
    let writer = sink.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, sink.contents())
}
