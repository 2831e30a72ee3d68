use journal_types::DailyContext;

const MAX_COMMITS_PER_REPO: usize = 10;
const MAX_BODY_CHARS: usize = 200;
const MAX_PLANS: usize = 5;
const MAX_PLAN_CHARS: usize = 300;
const MAX_FILES_TOUCHED: usize = 10;

/// Build the single journal prompt from the day's context. Everything the
/// model sees is capped here; these limits are the token-cost boundary for
/// the one provider call.
pub fn build_prompt(ctx: &DailyContext) -> String {
    let mut prompt = format!(
        "You are helping me write my daily work journal. Today is {}.\n\n\
         I want a natural, personal journal entry that:\n\
         1. Understands what I actually accomplished (not just what I committed)\n\
         2. Learns from my commit patterns to infer the bigger picture\n\
         3. Reads like a personal reflection, not a technical report\n\
         4. Connects my work to goals and accomplishments\n\n\
         Here's what I did today:\n\n\
         ## Git Commits ({} total)\n\n",
        ctx.date, ctx.total_commits
    );

    for (repo, commits) in &ctx.commits_by_repo {
        prompt.push_str(&format!("\n### {} ({} commits)\n\n", repo, commits.len()));
        for commit in commits.iter().take(MAX_COMMITS_PER_REPO) {
            prompt.push_str(&format!("- `{}`: {}\n", commit.hash, commit.subject));
            if let Some(body) = &commit.body {
                let snippet: String = body.chars().take(MAX_BODY_CHARS).collect();
                prompt.push_str(&format!("  {snippet}\n"));
            }
        }
    }

    if !ctx.plans.is_empty() {
        prompt.push_str(&format!("\n## Plans ({} active)\n\n", ctx.plans.len()));
        for plan in ctx.plans.iter().take(MAX_PLANS) {
            let snippet: String = plan.content_preview.chars().take(MAX_PLAN_CHARS).collect();
            prompt.push_str(&format!("- {}: {}...\n", plan.file, snippet));
        }
    }

    if !ctx.activity.is_empty() {
        prompt.push_str("\n## AI Coding Activity\n\n");
        prompt.push_str(&format!(
            "- Generated code for {} files\n",
            ctx.activity.code_generated.len()
        ));
        if !ctx.activity.files_touched.is_empty() {
            let files: Vec<&str> = ctx
                .activity
                .files_touched
                .iter()
                .take(MAX_FILES_TOUCHED)
                .map(String::as_str)
                .collect();
            prompt.push_str(&format!("- Files touched: {}\n", files.join(", ")));
        }
    }

    prompt.push_str(
        "\n\n## Instructions\n\n\
         Write a personal journal entry (2-3 paragraphs) that:\n\n\
         1. **Understands accomplishments**: Look at the commits and infer what \
         problems I was solving or features I was building. Don't just list \
         commits - explain what I achieved.\n\n\
         2. **Natural language**: Write in first person, like I'm reflecting on \
         my day. Use phrases like \"I worked on...\", \"I figured out...\", \
         \"I made progress on...\"\n\n\
         3. **Connect the dots**: If I made multiple commits to the same \
         feature, group them together. If I worked across multiple projects, \
         explain how they relate.\n\n\
         4. **Learning from patterns**: Notice patterns in commit messages - if \
         I'm fixing bugs, building features, refactoring, etc. Reflect that in \
         the narrative.\n\n\
         5. **Personal tone**: This is MY journal. Make it feel authentic and \
         reflective, not like a changelog.\n\n\
         Example style:\n\
         \"Today I focused on improving the authentication system. I spent time \
         debugging some edge cases that were causing issues for users, and then \
         refactored the login flow to make it more robust. I also started \
         exploring a new feature for the dashboard, though that's still in \
         early stages.\"\n\n\
         Write the journal entry now:",
    );

    prompt
}
