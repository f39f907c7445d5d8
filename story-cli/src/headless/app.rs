use console::style;
use storyteller_core::config::config::StoryConfig;
use storyteller_core::{render_outcome, save_to_path, StoryRequest};

/// One-shot generation without the web form
pub struct AppHeadless {
    config: StoryConfig,
}

impl AppHeadless {
    pub fn new(config: StoryConfig) -> Self {
        Self { config }
    }

    pub async fn run(&self, request: StoryRequest, save: bool) -> Result<(), Box<dyn std::error::Error>> {
        let storyteller = self.config.storyteller()?;
        eprintln!("{}", style(format!("░ {} on {}", storyteller.model(), storyteller.provider_name())).dim());

        let outcome = storyteller.generate(&request).await;
        let text = render_outcome(&outcome);
        println!("{}", text);

        if save {
            let path = save_to_path(&self.config.export_file, &text)?;
            eprintln!("{}", style(format!("saved to {}", path.display())).dim());
        }

        // the text is printed either way; the exit status still reports the failure
        outcome.map(|_| ()).map_err(|e| e.into())
    }
}
