use std::slice;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::constants::is_null_literal;
use crate::model::{Model, TypeDef};
use crate::value::Value;
use crate::Result;

/// Parse-time fragment of a document. The associated type of every item is
/// fixed when the item is created.
#[derive(Debug, Clone)]
pub enum Item {
    List(ListItem),
    Object(ObjectItem),
    Value(ValueItem),
}

#[derive(Debug, Clone)]
pub struct ListItem {
    items: Vec<Item>,
    as_list: bool,
    ty: Option<Arc<TypeDef>>,
}

#[derive(Debug, Clone)]
pub struct ObjectItem {
    params: IndexMap<String, Item>,
    class: Option<Arc<TypeDef>>,
}

#[derive(Debug, Clone)]
pub struct ValueItem {
    value: String,
    quoted: bool,
    class: Option<Arc<TypeDef>>,
}

impl ListItem {
    pub fn new(items: Vec<Item>, as_list: bool, ty: Option<Arc<TypeDef>>) -> Self {
        Self { items, as_list, ty }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// `false` when the elements should be collected into an array.
    pub fn is_as_list(&self) -> bool {
        self.as_list
    }

    pub fn ty(&self) -> Option<&Arc<TypeDef>> {
        self.ty.as_ref()
    }

    pub fn build_instance(&self, model: &Model) -> Result<Value> {
        match &self.ty {
            Some(ty) => ty.build_collection(ItemIter::slice(&self.items), self.as_list, model),
            None => Ok(Value::Null),
        }
    }
}

impl ObjectItem {
    pub fn new(class: Option<Arc<TypeDef>>) -> Self {
        Self {
            params: IndexMap::new(),
            class,
        }
    }

    pub fn put_param(&mut self, key: impl Into<String>, value: Item) {
        self.params.insert(key.into(), value);
    }

    pub fn param(&self, key: &str) -> Option<&Item> {
        self.params.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn class(&self) -> Option<&Arc<TypeDef>> {
        self.class.as_ref()
    }
}

impl ValueItem {
    pub fn new(value: impl Into<String>, class: Option<Arc<TypeDef>>) -> Self {
        Self {
            value: value.into(),
            quoted: false,
            class,
        }
    }

    /// Payload read from a quoted string.
    pub fn quoted(value: impl Into<String>, class: Option<Arc<TypeDef>>) -> Self {
        Self {
            value: value.into(),
            quoted: true,
            class,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_quoted(&self) -> bool {
        self.quoted
    }

    /// Bare `null` token.
    pub fn is_null_literal(&self) -> bool {
        !self.quoted && is_null_literal(&self.value)
    }

    pub fn class(&self) -> Option<&Arc<TypeDef>> {
        self.class.as_ref()
    }
}

impl Item {
    /// Raw payload of a value item.
    pub fn string_value(&self) -> Option<&str> {
        match self {
            Item::Value(value) => Some(value.value()),
            _ => None,
        }
    }

    /// Short rendering used in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Item::List(list) => format!("[{}]", list.items.len()),
            Item::Object(object) => format!("{{{}}}", object.params.len()),
            Item::Value(value) => value.value.clone(),
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Item::List(_))
    }

    /// Elements of a list; an object yields itself once, a value nothing.
    pub fn iter(&self) -> ItemIter<'_> {
        match self {
            Item::List(list) => ItemIter::slice(&list.items),
            Item::Object(_) => ItemIter::once(self),
            Item::Value(_) => ItemIter::empty(),
        }
    }

    pub fn list_size(&self) -> usize {
        match self {
            Item::List(list) => list.items.len(),
            Item::Object(_) => 1,
            Item::Value(_) => 0,
        }
    }

    pub fn param(&self, key: &str) -> Option<&Item> {
        match self {
            Item::Object(object) => object.param(key),
            _ => None,
        }
    }

    pub fn param_keys(&self) -> Vec<&str> {
        match self {
            Item::Object(object) => object.keys().collect(),
            _ => Vec::new(),
        }
    }

    pub fn print_class_name(&self) -> String {
        match self {
            Item::List(list) if list.as_list => "List<>".to_string(),
            Item::List(_) => "[]".to_string(),
            Item::Object(ObjectItem { class, .. }) | Item::Value(ValueItem { class, .. }) => class
                .as_ref()
                .map_or_else(|| "null".to_string(), |class| class.name().to_string()),
        }
    }

    /// Builds the value this item describes. Untyped items build to `Null`.
    pub fn build_instance(&self, model: &Model) -> Result<Value> {
        match self {
            Item::List(list) => list.build_instance(model),
            Item::Object(ObjectItem { class, .. }) | Item::Value(ValueItem { class, .. }) => {
                match class {
                    Some(class) => class.build(self, model),
                    None => Ok(Value::Null),
                }
            }
        }
    }
}

pub struct ItemIter<'a> {
    inner: ItemIterInner<'a>,
}

enum ItemIterInner<'a> {
    Slice(slice::Iter<'a, Item>),
    Once(Option<&'a Item>),
}

impl<'a> ItemIter<'a> {
    pub fn slice(items: &'a [Item]) -> Self {
        Self {
            inner: ItemIterInner::Slice(items.iter()),
        }
    }

    pub fn once(item: &'a Item) -> Self {
        Self {
            inner: ItemIterInner::Once(Some(item)),
        }
    }

    pub fn empty() -> Self {
        Self {
            inner: ItemIterInner::Once(None),
        }
    }
}

impl<'a> Iterator for ItemIter<'a> {
    type Item = &'a Item;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            ItemIterInner::Slice(iter) => iter.next(),
            ItemIterInner::Once(item) => item.take(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            ItemIterInner::Slice(iter) => iter.size_hint(),
            ItemIterInner::Once(item) => {
                let len = usize::from(item.is_some());
                (len, Some(len))
            }
        }
    }
}

impl ExactSizeIterator for ItemIter<'_> {}
