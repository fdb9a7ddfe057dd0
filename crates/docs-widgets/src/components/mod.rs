mod prompt_link;

pub use prompt_link::PromptLink;
