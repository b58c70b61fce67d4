use serde_json::{Value, json};

pub(super) fn summary_instruction(dialogue: &str) -> String {
    format!(
        "You are a support ticket analyst.\n\
         \n\
         Below is a dialogue between a client and a support agent:\n\
         \n\
         {dialogue}\n\
         \n\
         Summarize the ticket with exactly one short sentence per field:\n\
         - issue: the essence of the client's question;\n\
         - action: what the agent did;\n\
         - result: the current outcome or status.\n\
         \n\
         Never write more than one sentence per field. Be brief, state facts only, \
         and write in the language of the dialogue."
    )
}

pub(super) fn summary_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "issue": {"type": "STRING"},
            "action": {"type": "STRING"},
            "result": {"type": "STRING"}
        },
        "required": ["issue", "action", "result"]
    })
}

pub(super) fn evaluation_instruction(dialogue: &str, tov_rules: &str) -> String {
    format!(
        "You are a quality assurance specialist reviewing a support conversation.\n\
         \n\
         Tone of voice rules:\n\
         {tov_rules}\n\
         \n\
         Dialogue:\n\
         {dialogue}\n\
         \n\
         Evaluate only the AGENT lines against the rules above and return:\n\
         - language: language tag of the dialogue (for example \"en\" or \"ru\");\n\
         - tov_score: integer from 0 to 5 for compliance with the tone of voice rules;\n\
         - solution_score: integer from 0 to 5 for how well the client's problem was solved;\n\
         - errors: list of concrete rule violations, empty when there are none;\n\
         - next_action: one sentence recommending what the agent should do next."
    )
}

pub(super) fn evaluation_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "language": {"type": "STRING"},
            "tov_score": {"type": "INTEGER"},
            "solution_score": {"type": "INTEGER"},
            "errors": {"type": "ARRAY", "items": {"type": "STRING"}},
            "next_action": {"type": "STRING"}
        },
        "required": ["language", "tov_score", "solution_score", "errors", "next_action"]
    })
}
