pub mod assistant_llm;
pub mod completion_llm;

pub use assistant_llm::OpenAiAssistantAdapter;
pub use completion_llm::OpenAiCompletionAdapter;
