//! Boundary with emission backends.
//!
//! A backend is a [`Plugin`]: it receives the finished [`CodegenModel`] and
//! its own options, and renders some text out of them. Plugins never mutate
//! the model, so any number of them may run over the same one.

use arcstr::ArcStr;
use async_trait::async_trait;
use derive_more::with_trait::From;
use itertools::Itertools as _;

use crate::{CodegenError, CodegenModel, GeneratorConfig, PluginConfig};

/// What a [`Plugin`] is given to work with.
#[derive(Clone, Copy, Debug)]
pub struct PluginContext<'a> {
    /// Model to render.
    pub model: &'a CodegenModel,
    /// Options of this plugin.
    pub config: &'a PluginConfig,
    /// Path of the file the output ends up in.
    pub output_file: &'a str,
    /// Names of all the plugins rendering into the same file, in order.
    pub all_plugins: &'a [ArcStr],
}

/// Output of a single [`Plugin`].
#[derive(Clone, Debug, Eq, From, PartialEq)]
pub enum PluginOutput {
    /// Plain text.
    Text(String),

    /// Text with blocks to put before and after the output of all plugins.
    #[from(skip)]
    Structured {
        /// Text placed among the contents of other plugins.
        content: String,
        /// Blocks placed at the very beginning, like imports.
        prepend: Vec<String>,
        /// Blocks placed at the very end.
        append: Vec<String>,
    },
}

impl PluginOutput {
    /// Text placed among the contents of other plugins.
    pub fn content(&self) -> &str {
        match self {
            Self::Text(content) | Self::Structured { content, .. } => content,
        }
    }

    fn prepend(&self) -> &[String] {
        match self {
            Self::Text(_) => &[],
            Self::Structured { prepend, .. } => prepend,
        }
    }

    fn append(&self) -> &[String] {
        match self {
            Self::Text(_) => &[],
            Self::Structured { append, .. } => append,
        }
    }
}

/// Emission backend.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Name the plugin is configured under.
    fn name(&self) -> &str;

    /// Checks that the plugin can render in the given context, before anything
    /// is rendered.
    ///
    /// Accepts everything by default.
    async fn validate(&self, ctx: &PluginContext<'_>) -> Result<(), String> {
        let _ = ctx;
        Ok(())
    }

    /// Renders the model.
    async fn render(&self, ctx: &PluginContext<'_>) -> Result<PluginOutput, CodegenError>;
}

/// Validates then renders with a single `plugin`.
///
/// # Errors
///
/// A rejection by [`Plugin::validate`] is reported as
/// [`CodegenError::PluginValidation`]. Errors of [`Plugin::render`] are
/// returned as is.
pub async fn execute_plugin(
    plugin: &dyn Plugin,
    ctx: &PluginContext<'_>,
) -> Result<PluginOutput, CodegenError> {
    __codegen_trace_debug!("Executing plugin {} for {}", plugin.name(), ctx.output_file);

    plugin
        .validate(ctx)
        .await
        .map_err(|message| CodegenError::PluginValidation {
            plugin: plugin.name().into(),
            message,
        })?;

    plugin.render(ctx).await
}

/// Concatenates `outputs` into the text of a single file.
///
/// All prepended blocks come first, without duplicates, then the contents in
/// the order of `outputs`, then all appended blocks. Blocks are separated by
/// newlines.
pub fn merge_outputs(outputs: &[PluginOutput]) -> String {
    let prepend = outputs
        .iter()
        .flat_map(PluginOutput::prepend)
        .unique()
        .map(String::as_str);
    let content = outputs.iter().map(PluginOutput::content);
    let append = outputs
        .iter()
        .flat_map(PluginOutput::append)
        .map(String::as_str);

    prepend.chain(content).chain(append).join("\n")
}

/// Runs `plugins` one after another over the same `model` and merges their
/// outputs.
///
/// Each plugin gets the options it's configured with in `config`, or none.
/// Stops at the first failing plugin.
pub async fn execute_plugins(
    plugins: &[&dyn Plugin],
    model: &CodegenModel,
    config: &GeneratorConfig,
    output_file: &str,
) -> Result<String, CodegenError> {
    __codegen_span_debug!("execute_plugins", output_file = output_file);

    let names = plugins
        .iter()
        .map(|p| ArcStr::from(p.name()))
        .collect::<Vec<_>>();
    let no_options = PluginConfig::new();

    let mut outputs = Vec::with_capacity(plugins.len());
    for &plugin in plugins {
        let ctx = PluginContext {
            model,
            config: config.plugin_config(plugin.name()).unwrap_or(&no_options),
            output_file,
            all_plugins: &names,
        };
        outputs.push(execute_plugin(plugin, &ctx).await?);
    }

    Ok(merge_outputs(&outputs))
}
