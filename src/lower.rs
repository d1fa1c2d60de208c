//! raw → ir. Decides node kinds, checks required fields and rewrites
//! reference tokens in descriptions.
use std::sync::Arc;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::ir::{
    EnumValue, EventSchema, Facets, FunctionSchema, Parameter, PropertySchema, TypeDefinition,
    TypeKind, TypeSchema,
};
use crate::preprocess::ReferenceRewriter;
use crate::raw::{RawEnumValue, RawType};

/// Lowering context for one namespace.
pub struct Lowerer<'a> {
    namespace: &'a str,
    rewriter: &'a ReferenceRewriter,
}

impl<'a> Lowerer<'a> {
    pub fn new(namespace: &'a str, rewriter: &'a ReferenceRewriter) -> Self {
        Self { namespace, rewriter }
    }

    pub fn function(&self, raw: RawType, path: &str) -> Result<FunctionSchema> {
        let name = raw.name.ok_or(Error::MissingField { path: path.to_string(), field: "name" })?;
        let path = format!("{path}({name})");
        Ok(FunctionSchema {
            description: self.text(raw.description),
            parameters: self.parameters(raw.parameters, &format!("{path}.parameters"))?,
            returns: self.returns(raw.returns, &path)?,
            name,
        })
    }

    pub fn event(&self, raw: RawType, path: &str) -> Result<EventSchema> {
        let name = raw.name.ok_or(Error::MissingField { path: path.to_string(), field: "name" })?;
        let path = format!("{path}({name})");
        Ok(EventSchema {
            description: self.text(raw.description),
            parameters: self.parameters(raw.parameters, &format!("{path}.parameters"))?,
            extra_parameters: self
                .parameters(raw.extra_parameters, &format!("{path}.extraParameters"))?,
            returns: self.returns(raw.returns, &path)?,
            name,
        })
    }

    pub fn type_definition(&self, raw: RawType, path: &str) -> Result<TypeDefinition> {
        let id = raw.id.clone().ok_or(Error::MissingField { path: path.to_string(), field: "id" })?;
        let path = format!("{path}({id})");
        let schema = self.type_schema(raw, &path, false)?;
        Ok(TypeDefinition { id, schema: Arc::new(schema) })
    }

    /// Properties may be declared by a constant `value` alone.
    pub fn property(&self, name: &str, raw: RawType, path: &str) -> Result<PropertySchema> {
        let schema = self.type_schema(raw, path, true)?;
        Ok(PropertySchema {
            name: name.to_string(),
            description: schema.description.clone(),
            schema: Arc::new(schema),
        })
    }

    pub fn type_schema(&self, raw: RawType, path: &str, allow_value: bool) -> Result<TypeSchema> {
        let tags = [raw.type_.is_some(), raw.ref_.is_some(), raw.choices.is_some()];
        if tags.iter().filter(|t| **t).count() > 1 {
            return Err(Error::malformed(path, "more than one of `type`, `$ref` and `choices`"));
        }

        let kind = if let Some(target) = raw.ref_ {
            TypeKind::Reference { target }
        } else if let Some(choices) = raw.choices {
            let choices = choices
                .into_iter()
                .enumerate()
                .map(|(i, c)| self.child(c, &format!("{path}.choices[{i}]")))
                .collect::<Result<Vec<_>>>()?;
            TypeKind::Union { choices }
        } else if let Some(type_) = raw.type_ {
            match type_.as_str() {
                "array" => {
                    let items = raw
                        .items
                        .ok_or_else(|| Error::malformed(path, "array without `items`"))?;
                    TypeKind::Array { items: self.child(*items, &format!("{path}.items"))? }
                }
                "object" => {
                    let properties = raw
                        .properties
                        .unwrap_or_default()
                        .into_iter()
                        .map(|(k, v)| {
                            let child = self.child(v, &format!("{path}.{k}"))?;
                            Ok::<_, Error>((k, child))
                        })
                        .collect::<Result<_>>()?;
                    TypeKind::Object { properties }
                }
                "function" => TypeKind::Function {
                    parameters: self.parameters(raw.parameters, &format!("{path}.parameters"))?,
                    returns: self.returns(raw.returns, path)?,
                },
                _ => TypeKind::Primitive { name: type_ },
            }
        } else if let Some(value) = raw.value.as_ref().filter(|_| allow_value) {
            TypeKind::Primitive { name: primitive_of_value(value, path)?.to_string() }
        } else {
            return Err(Error::malformed(path, "node has none of `type`, `$ref` or `choices`"));
        };

        let facets = Facets {
            enum_values: raw.enum_.map(|values| {
                values
                    .into_iter()
                    .map(|v| match v {
                        RawEnumValue::Bare(s) => EnumValue::Bare(s),
                        RawEnumValue::Described { name, description } => {
                            EnumValue::Described { name, description: self.text(description) }
                        }
                    })
                    .collect()
            }),
            min_items: raw.min_items,
            max_items: raw.max_items,
            minimum: raw.minimum,
            maximum: raw.maximum,
        };

        Ok(TypeSchema {
            kind,
            optional: raw.optional,
            description: self.text(raw.description),
            facets,
        })
    }

    fn child(&self, raw: RawType, path: &str) -> Result<Arc<TypeSchema>> {
        self.type_schema(raw, path, false).map(Arc::new)
    }

    /// Absent parameter lists mean "no parameters".
    fn parameters(&self, raw: Option<Vec<RawType>>, path: &str) -> Result<Vec<Parameter>> {
        raw.unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(i, p)| {
                let at = format!("{path}[{i}]");
                let name = p.name.clone().ok_or(Error::MissingField { path: at.clone(), field: "name" })?;
                let schema = self.child(p, &format!("{path}.{name}"))?;
                Ok(Parameter { name, schema })
            })
            .collect()
    }

    fn returns(&self, raw: Option<Box<RawType>>, path: &str) -> Result<Option<Arc<TypeSchema>>> {
        raw.map(|r| self.child(*r, &format!("{path}.returns"))).transpose()
    }

    fn text(&self, text: Option<String>) -> Option<String> {
        text.map(|t| self.rewriter.rewrite(&t, self.namespace).into_owned())
    }
}

fn primitive_of_value(value: &Value, path: &str) -> Result<&'static str> {
    Ok(match value {
        Value::String(_) => "string",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        _ => return Err(Error::malformed(path, "`value` must be a string, number or boolean")),
    })
}
