//! Prompt template for provider lookups

use crate::question::kind::QuestionKind;
use crate::question::request::ResolutionRequest;

/// Templates for generating provider prompts
pub struct PromptTemplate;

impl PromptTemplate {
    /// Per-kind instruction telling the provider how to shape its answer
    pub fn kind_instruction(kind: QuestionKind) -> &'static str {
        match kind {
            QuestionKind::Single => {
                "单选题：只返回一个正确选项的完整内容，不要包含字母前缀（如A. B. C.），直接返回选项文字。"
            }
            QuestionKind::Multiple => {
                "多选题：如果有多个正确答案，用三个井号###连接每个答案的内容。"
            }
            QuestionKind::Judgement => "判断题：直接返回'对'或'错'。",
            QuestionKind::Fill => "填空题：直接返回填空内容，如果有多个空，用###连接。",
        }
    }

    /// Full prompt for a resolution request
    pub fn answer_prompt(request: &ResolutionRequest) -> String {
        let mut prompt = format!(
            r#"你是一个专业的题库系统，请根据问题提供准确的答案。

{}

重要：
- 只返回答案内容，不要包含任何解释或额外文字
- 不要返回字母编号（如A、B、C）
- 严格使用JSON格式：{{"answer":"答案内容"}}
- 不要返回任何自然语言描述

例如：
- 如果答案是"A. 北京"，只返回"北京"
- 如果答案是"对"或"错"，直接返回"对"或"错"
- 如果填空题答案是"北京###上海"，返回"北京###上海"

问题：{}"#,
            Self::kind_instruction(request.question_kind()),
            request.question_text()
        );

        if request.has_options() {
            prompt.push_str(&format!("\n选项：{}", request.options_text()));
        }

        prompt
    }
}
