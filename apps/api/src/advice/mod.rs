// Advice: prompt construction and the request pipeline.
// All remote calls go through advisor_client; nothing here builds HTTP requests.

pub mod handlers;
pub mod pipeline;
pub mod prompts;
