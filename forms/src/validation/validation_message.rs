// Copyright (c) 2026 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{FieldDefinition, FieldValue, Interpolation, LocaleContext, interpolate};

/// Builds one user facing validation message. The template is the field's own override
/// when it has one, else the locale's `validation.*` entry. Every message can use
/// `{label}` and `{value}`, rule specific tokens are added with [`Self::token`].
#[derive(Debug)]
pub struct ValidationMessage<'a> {
    locale: &'a LocaleContext,
    template_override: Option<&'a str>,
    key: &'static str,
    tokens: Interpolation,
}

impl<'a> ValidationMessage<'a> {
    #[must_use]
    pub fn new(
        locale: &'a LocaleContext,
        definition: &FieldDefinition,
        value: &FieldValue,
        key: &'static str,
        template_override: Option<&'a str>,
    ) -> Self {
        let mut tokens = Interpolation::new();
        tokens.insert("label".into(), definition.label.clone());
        tokens.insert("value".into(), value.to_string());
        Self {
            locale,
            template_override,
            key,
            tokens,
        }
    }

    #[must_use]
    pub fn token(mut self, name: &str, value: impl Into<String>) -> Self {
        self.tokens.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn render(self) -> String {
        match self.template_override {
            Some(template) => interpolate(template, &self.tokens),
            None => self.locale.str(self.key, Some(&self.tokens)),
        }
    }
}
