pub mod qa_agent;
pub mod transcript_analyst;
