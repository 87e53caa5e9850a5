//! Processor
//!
//! A processor owns one registry, configured and resolved up front, so every
//! configuration error surfaces in [`Processor::new`]. Processing itself never
//! fails: whatever the grammar cannot make sense of is emitted as text.
//!
//! Processors share nothing mutable. Several may run side by side with
//! different configurations, and one processor may be used from many threads.

use crate::texier::ast::{Document, Node};
use crate::texier::config::{load_defaults, TexierConfig};
use crate::texier::modules::{standard_modules, SyntaxModule};
use crate::texier::parsing::{nodes, GrammarError, Registry};
use crate::texier::validation::{AllowListPolicy, Dtd, Policy, PolicyError};
use config::ConfigError;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("grammar error: {0}")]
    Grammar(#[from] GrammarError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("policy error: {0}")]
    Policy(#[from] PolicyError),
}

pub struct Processor {
    registry: Registry,
    modules: Vec<Box<dyn SyntaxModule>>,
}

impl Processor {
    /// Processor with the policy described by `config.policy`.
    pub fn new(config: &TexierConfig) -> Result<Self, ProcessingError> {
        let policy = AllowListPolicy::from_config(&config.policy, Dtd::html())?;
        Self::with_policy(config, Arc::new(policy))
    }

    /// Processor with the embedded default configuration.
    pub fn with_defaults() -> Result<Self, ProcessingError> {
        Self::new(&load_defaults()?)
    }

    /// Processor validating against `policy` instead of the configured one.
    pub fn with_policy(config: &TexierConfig, policy: Arc<dyn Policy>) -> Result<Self, ProcessingError> {
        let mut registry = Registry::new(policy);
        registry.set_option("phrase", &config.phrase)?;
        registry.set_option("html", &config.html)?;
        registry.set_option("heading", &config.heading)?;
        registry.set_option("list", &config.list)?;
        registry.set_option("smilies", &config.smilies)?;

        let modules = standard_modules();
        for module in &modules {
            module.register(&mut registry)?;
        }
        for name in &config.productions.enabled {
            registry.set_enabled(name, true)?;
        }
        for name in &config.productions.disabled {
            registry.set_enabled(name, false)?;
        }

        registry.grammar()?;
        debug!(
            modules = modules.len(),
            productions = registry.productions().len(),
            "processor ready"
        );
        Ok(Self { registry, modules })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn process(&self, text: &str) -> Document {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        debug!(bytes = text.len(), "processing document");

        let parsed = self
            .registry
            .grammar()
            .ok()
            .and_then(|grammar| grammar.parse_document(&text));
        let children = match parsed {
            Some(success) => nodes(success.captures),
            None => {
                warn!("document did not parse, emitting it as text");
                vec![Node::Text(text.trim().to_string())]
            }
        };

        let mut document = Document::new(children);
        for module in &self.modules {
            module.finish(&self.registry, &mut document);
        }
        document
    }

    pub fn to_html(&self, text: &str) -> String {
        self.process(text).to_html()
    }
}
