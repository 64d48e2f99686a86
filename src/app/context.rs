use crate::domain::prompt::{PromptBuilder, TemplateRenderer};
use crate::domain::{AppConfig, AssemblyPolicy, Thresholds};
use crate::ports::{CompletionGateway, ImageGateway};

/// Application context holding dependencies for command execution.
pub struct AppContext<G: CompletionGateway, I: ImageGateway, R: TemplateRenderer> {
    config: AppConfig,
    gateway: G,
    images: I,
    prompts: PromptBuilder<R>,
}

impl<G: CompletionGateway, I: ImageGateway, R: TemplateRenderer> AppContext<G, I, R> {
    /// Create a context; the prompt builder takes its model and markers from `config`.
    pub fn new(config: AppConfig, gateway: G, images: I, renderer: R) -> Self {
        let prompts =
            PromptBuilder::new(renderer, config.gateway.model.clone(), config.assembly.markers());
        Self { config, gateway, images, prompts }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn images(&self) -> &I {
        &self.images
    }

    pub fn prompts(&self) -> &PromptBuilder<R> {
        &self.prompts
    }

    pub fn thresholds(&self) -> Thresholds {
        self.config.assembly.thresholds()
    }

    pub fn policy(&self) -> AssemblyPolicy {
        self.config.assembly.policy()
    }
}
