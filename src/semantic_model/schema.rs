//! Root schema definition

use serde::Deserialize;
use std::path::Path;
use super::column::ColumnSpec;
use super::enumeration::EnumType;
use super::types::SemanticType;
use crate::combiner::Dialect;
use crate::error::{ParseError, SchemaError};
use crate::query::{Param, Query};

/// The root schema: the dialect to combine for, plus named row models
#[derive(Debug, Default, Deserialize)]
pub struct Schema {
    /// Target database dialect
    #[serde(default)]
    pub dialect: Dialect,
    /// Enumerations referenced by `enum(name)` column types
    #[serde(default)]
    pub enums: Vec<EnumType>,
    /// Row models - the projections queries against this schema produce
    #[serde(default)]
    pub models: Vec<Model>,
}

/// A row model - the ordered columns a row-producing query projects
#[derive(Debug, Deserialize)]
pub struct Model {
    pub name: String,
    pub columns: Vec<ColumnSpec>,
}

impl Schema {
    /// Load and validate a schema from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ParseError> {
        crate::parser::parse_file(path)
    }

    /// Get a row model by name
    pub fn get_model(&self, name: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.name == name)
    }

    /// Get an enum by name
    pub fn get_enum(&self, name: &str) -> Option<&EnumType> {
        self.enums.iter().find(|e| e.name == name)
    }

    /// Column specs of a model, with enum value spaces resolved
    pub fn columns(&self, model: &str) -> Result<Vec<ColumnSpec>, SchemaError> {
        let model_def = self
            .get_model(model)
            .ok_or_else(|| SchemaError::UnknownModel(model.to_string()))?;

        model_def
            .columns
            .iter()
            .map(|column| self.resolve_column(model, column))
            .collect()
    }

    fn resolve_column(&self, model: &str, column: &ColumnSpec) -> Result<ColumnSpec, SchemaError> {
        let SemanticType::Enum(reference) = &column.semantic_type else {
            return Ok(column.clone());
        };
        if reference.is_resolved() {
            return Ok(column.clone());
        }
        let resolved = self.get_enum(&reference.name).ok_or_else(|| SchemaError::UnknownEnum {
            model: model.to_string(),
            column: column.name.clone(),
            name: reference.name.clone(),
        })?;
        Ok(ColumnSpec {
            semantic_type: SemanticType::Enum(resolved.clone()),
            ..column.clone()
        })
    }

    /// Build a row query whose projection is the given model
    pub fn rows(&self, model: &str, sql: impl Into<String>, params: Vec<Param>) -> Result<Query, SchemaError> {
        Ok(Query::rows(sql, params, self.columns(model)?))
    }

    /// Count the rows a model query matches
    pub fn count(&self, model: &str, sql: impl Into<String>, params: Vec<Param>) -> Result<Query, SchemaError> {
        Ok(Query::count(self.rows(model, sql, params)?))
    }

    /// First row of a model query, or nothing
    pub fn get_or_none(&self, model: &str, sql: impl Into<String>, params: Vec<Param>) -> Result<Query, SchemaError> {
        Ok(Query::get_or_none(self.rows(model, sql, params)?))
    }

    /// Check every model resolves
    pub fn validate(&self) -> Result<(), SchemaError> {
        for model in &self.models {
            self.columns(&model.name)?;
        }
        Ok(())
    }
}
