use crate::output::print_json;
use gemini_agent::prompts::mission_plan_schema;

/// The response schema sent with every plan request.
pub fn run() -> anyhow::Result<()> {
    print_json(&mission_plan_schema())
}
