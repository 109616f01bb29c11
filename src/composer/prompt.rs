//! Prompt construction for both recommendation variants

use crate::audit::AuditCheck;
use crate::browser::PageContent;
use crate::composer::error::ComposeError;

/// Maximum number of audit checks embedded in the feedback prompt
pub const MAX_PROMPT_CHECKS: usize = 5;

/// Build the content-analysis prompt from summarized page content
pub fn content_prompt(url: &str, content: &PageContent) -> Result<String, ComposeError> {
    let headings = content
        .headings
        .iter()
        .enumerate()
        .map(|(index, texts)| format!("H{}: {}", index + 1, texts.join(" | ")))
        .collect::<Vec<_>>()
        .join("\n");

    Ok(format!(
        "Analyze the following website content for SEO optimizations:\n\n\
        URL: {url}\n\n\
        Title: {title}\n\
        Meta Description: {meta}\n\n\
        Headings:\n{headings}\n\n\
        Paragraphs:\n{paragraphs}\n\n\
        Lists:\n{lists}\n\n\
        Links: {links}\n\n\
        Images: {images}\n\n\
        Provide a comprehensive SEO analysis and improvement plan based on this content. Focus on:\n\
        1. Meta tags optimization\n\
        2. Heading structure and content hierarchy\n\
        3. Paragraph content, keyword usage, and readability\n\
        4. List structure and content relevance\n\
        5. Internal and external linking strategy\n\
        6. Image optimization (alt tags, file names)\n\
        7. Content organization and user experience\n\
        8. Keyword placement, density, and semantic relevance\n\
        9. Mobile-friendliness considerations\n\
        10. Page load speed implications (based on content structure)\n\n\
        For each area, provide detailed, actionable recommendations and explain their \
        potential impact on SEO. Consider both on-page and technical SEO factors in your analysis.",
        url = url,
        title = content.title,
        meta = content.meta_description,
        headings = headings,
        paragraphs = content.paragraphs.join("\n\n"),
        lists = serde_json::to_string_pretty(&content.lists)?,
        links = serde_json::to_string_pretty(&content.links)?,
        images = serde_json::to_string_pretty(&content.images)?,
    ))
}

/// Select the checks worth showing the model: a score of zero means the
/// check failed outright and null means not applicable, so only positive,
/// non-null scores are kept, in received order, truncated to
/// [`MAX_PROMPT_CHECKS`].
pub fn actionable_checks(checks: &[AuditCheck]) -> Vec<&AuditCheck> {
    checks
        .iter()
        .filter(|check| matches!(check.score, Some(score) if score > 0.0))
        .take(MAX_PROMPT_CHECKS)
        .collect()
}

/// Build the audit-feedback prompt from the shaped check list
pub fn audit_prompt(checks: &[AuditCheck]) -> Result<String, ComposeError> {
    let selected = actionable_checks(checks);

    Ok(format!(
        "Analyze the following Lighthouse results for a website and provide detailed, \
        actionable feedback on how to improve the most critical issues:\n\n\
        Audits:\n{audits}\n\n\
        For each of the top 3-5 most critical issues:\n\n\
        1. Present the issue in the following format:\n\n\
        Problem: \n\
        [Clearly state the issue and its impact on the website's performance, accessibility, best practices, or SEO]\n\n\
        Solution:\n\
        - [Provide specific, actionable steps to resolve the issue]\n\
        - [Include any quick wins or easy fixes that could significantly improve the score]\n\
        - [Explain why each step is important and how it contributes to solving the problem]\n\n\
        2. Prioritize the most impactful recommendations that will have the greatest effect on \
        improving the site's overall performance and user experience.\n\n\
        3. Ensure that the solutions are practical and implementable, providing enough detail \
        for a web developer or site owner to follow and improve their site.\n\n\
        Limit your response to about 1000 words, focusing on the most critical issues and their solutions.",
        audits = serde_json::to_string_pretty(&selected)?,
    ))
}
