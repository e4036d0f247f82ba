//! Built-in prompt template catalog.
//!
//! A process-wide, immutable registry: template text lives in `&'static`
//! data and is resolved through [`template_content`]. Per-user overrides
//! are layered on top by the database-backed template service, which
//! falls back here when no active override exists.
//!
//! Template bodies use `{placeholder}` substitution slots and `{{`/`}}`
//! for literal braces (JSON examples). The catalog metadata (name,
//! category, description, parameter list) is descriptive only and never
//! affects substitution.

/// Descriptive metadata plus content for one built-in template.
#[derive(Debug, Clone, Copy)]
pub struct TemplateInfo {
    pub key: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub description: &'static str,
    pub parameters: &'static [&'static str],
    pub content: &'static str,
}

static WORLD_BUILDING: &str = r#"<system>
你是资深的世界观设计师，擅长为{genre}类型的小说构建真实、自洽的世界观。
</system>

<task>
【设计任务】
为小说《{title}》构建完整的世界观设定。

【核心要求】
- 主题契合：世界观必须支撑主题"{theme}"
- 简介匹配：为简介中的情节提供合理背景
- 类型适配：符合{genre}类型的特征
</task>

<strategy priority="P0">
【长篇类型策略 - 核心指导】
{genre_strategy}
</strategy>

<input priority="P0">
【项目信息】
书名：{title}
类型：{genre}
主题：{theme}
简介：{description}
</input>

<output priority="P0">
【输出格式】
生成包含 time_period、location、atmosphere、rules 四个字段的JSON对象，
每个字段300-500字，纯JSON输出，以{{开始、}}结束，无markdown标记。

【JSON示例】
{{
  "time_period": "……",
  "location": "……",
  "atmosphere": "……",
  "rules": "……"
}}
</output>"#;

static CHARACTERS_BATCH_GENERATION: &str = r#"<system>
你是专业的小说角色设计师，擅长设计立体、有冲突张力的角色群像。
</system>

<task>
为当前小说设计{count}个角色（含必要的组织/势力），并建立角色之间的关系网络。
</task>

<input priority="P0">
【世界观】
时间背景：{time_period}
地理环境：{location}
氛围基调：{atmosphere}
世界规则：{rules}

【项目信息】
主题：{theme}
类型：{genre}

【额外要求】
{requirements}
</input>

<output priority="P0">
输出JSON数组，每个元素包含 name、age、gender、role_type、personality、
background、appearance、traits 字段；组织额外包含 is_organization、
organization_type、organization_purpose 字段。纯JSON输出。
</output>"#;

static SINGLE_CHARACTER_GENERATION: &str = r#"<system>
你是专业的小说角色设计师。根据项目设定与用户要求，设计一个完整的新角色。
</system>

<input priority="P0">
【项目上下文】
{project_context}

【用户要求】
{user_input}
</input>

<output priority="P0">
输出单个JSON对象，包含 name、age、gender、role_type、personality、
background、appearance、traits 字段。纯JSON输出，以{{开始、}}结束。
</output>"#;

static SINGLE_ORGANIZATION_GENERATION: &str = r#"<system>
你是专业的小说势力设计师。根据项目设定与用户要求，设计一个完整的组织/势力。
</system>

<input priority="P0">
【项目上下文】
{project_context}

【用户要求】
{user_input}
</input>

<output priority="P0">
输出单个JSON对象，包含 name、organization_type、organization_purpose、
background、power_level、location、motto 字段。纯JSON输出。
</output>"#;

static OUTLINE_CREATE: &str = r#"<system>
你是资深的网文大纲架构师，擅长为{genre}类型的长篇小说设计章节大纲。
</system>

<strategy priority="P0">
【长篇类型策略】
{genre_strategy}
</strategy>

<input priority="P0">
【项目信息】
书名：{title}
主题：{theme}
类型：{genre}
叙事视角：{narrative_perspective}
计划章节数：{chapter_count}
目标总字数：{target_words}

【世界观】
时间背景：{time_period}
地理环境：{location}
氛围基调：{atmosphere}
世界规则：{rules}

【角色信息】
{characters_info}

【参考资料】
{mcp_references}

【额外要求】
{requirements}
</input>

<output priority="P0">
输出JSON数组，每个元素包含 title、content、structure、order_index 字段，
按情节推进排序。纯JSON输出。
</output>"#;

static OUTLINE_CONTINUE: &str = r#"<system>
你是资深的网文大纲架构师，负责为连载中的{genre}小说续写大纲。
</system>

<strategy priority="P0">
【长篇类型策略】
{genre_strategy}

【当前阶段指令】
{plot_stage_instruction}
</strategy>

<input priority="P0">
【项目信息】
书名：{title}
主题：{theme}
类型：{genre}
叙事视角：{narrative_perspective}
计划章节数：{chapter_count}

【世界观】
时间背景：{time_period}
地理环境：{location}
氛围基调：{atmosphere}
世界规则：{rules}

【角色信息】
{characters_info}

【已有进度】
当前章节数：{current_chapter_count}
全部章节梗概：{all_chapters_brief}
最近剧情：{recent_plot}
记忆上下文：{memory_context}

【参考资料】
{mcp_references}

【续写范围】
第{start_chapter}章 至 第{end_chapter}章
故事走向：{story_direction}

【额外要求】
{requirements}
</input>

<output priority="P0">
输出JSON数组，每个元素包含 title、content、structure、order_index 字段。
纯JSON输出。
</output>"#;

static CHAPTER_GENERATION_V2: &str = r#"<system>
你是畅销小说作家，正在创作《{project_title}》（{genre}）。以{narrative_perspective}展开叙述。
</system>

<task>
创作第{chapter_number}章《{chapter_title}》，目标字数{target_word_count}字。
</task>

<input priority="P0">
【本章大纲】
{chapter_outline}

【角色信息】
{characters_info}
</input>

<output priority="P0">
直接输出章节正文，不输出章节标题、序号或任何说明文字。
</output>"#;

static CHAPTER_GENERATION_V2_WITH_CONTEXT: &str = r#"<system>
你是畅销小说作家，正在连载《{project_title}》（{genre}）。以{narrative_perspective}展开叙述。
</system>

<task>
创作第{chapter_number}章《{chapter_title}》，目标字数{target_word_count}字，
与前文无缝衔接。
</task>

<input priority="P0">
【本章大纲】
{chapter_outline}

【角色信息】
{characters_info}

【衔接点（上一章结尾）】
{continuation_point}

【相关记忆】
{relevant_memories}

【故事骨架】
{story_skeleton}
</input>

<output priority="P0">
直接输出章节正文，不输出章节标题、序号或任何说明文字。
</output>"#;

static CHAPTER_REGENERATION_SYSTEM: &str = r#"<system>
你是资深的小说编辑与重写专家，负责按修改指令重写章节。
</system>

<input priority="P0">
【项目上下文】
{project_context}

【原始章节】
第{chapter_number}章《{title}》（{word_count}字）
{content}

【修改指令】
{modification_instructions}

【写作风格】
{style_content}
</input>

<output priority="P0">
重写后目标字数：{target_word_count}字。
直接输出重写后的章节正文，不输出标题和说明文字。
</output>"#;

static PLOT_ANALYSIS: &str = r#"<system>
你是专业的网文剧情分析师。
</system>

<task>
深度分析第{chapter_number}章《{title}》（{word_count}字）的剧情结构。
</task>

<input priority="P0">
【章节内容】
{content}
</input>

<output priority="P0">
输出JSON对象，包含 summary（剧情概要）、hooks（钩子）、foreshadowing（伏笔）、
character_development（角色发展）、pacing（节奏评价）字段。纯JSON输出。
</output>"#;

static INSPIRATION_TITLE_SYSTEM: &str = r#"你是一位专业的小说创作顾问。
根据用户的原始想法，生成6个风格各异的书名建议。

【用户想法】
{initial_idea}

要求：书名8字以内，朗朗上口，输出JSON数组，每个元素包含 title 和 reason 字段。"#;

static INSPIRATION_QUICK_COMPLETE: &str = r#"你是一位专业的小说创作顾问。用户提供了部分小说信息，请补全缺失的字段。

【已有信息】
{existing}

输出完整的JSON对象，包含 title、description、theme、genre 字段，
已有字段保持不变，缺失字段给出高质量补全。纯JSON输出，以{{开始、}}结束。"#;

/// Every built-in template with its catalog metadata, in presentation
/// order. The parameter lists describe the substitution slots template
/// authors can rely on; `genre_strategy` is derived, so it is not listed.
pub static BUILTIN_TEMPLATES: &[TemplateInfo] = &[
    TemplateInfo {
        key: "WORLD_BUILDING",
        name: "世界构建",
        category: "世界构建",
        description: "生成小说世界观设定，包括时间背景、地理位置、氛围基调和世界规则",
        parameters: &["title", "theme", "genre", "description"],
        content: WORLD_BUILDING,
    },
    TemplateInfo {
        key: "CHARACTERS_BATCH_GENERATION",
        name: "批量角色生成",
        category: "角色生成",
        description: "批量生成多个角色和组织，建立角色关系网络",
        parameters: &[
            "count",
            "time_period",
            "location",
            "atmosphere",
            "rules",
            "theme",
            "genre",
            "requirements",
        ],
        content: CHARACTERS_BATCH_GENERATION,
    },
    TemplateInfo {
        key: "SINGLE_CHARACTER_GENERATION",
        name: "单个角色生成",
        category: "角色生成",
        description: "生成单个角色的详细设定",
        parameters: &["project_context", "user_input"],
        content: SINGLE_CHARACTER_GENERATION,
    },
    TemplateInfo {
        key: "SINGLE_ORGANIZATION_GENERATION",
        name: "组织生成",
        category: "角色生成",
        description: "生成组织/势力的详细设定",
        parameters: &["project_context", "user_input"],
        content: SINGLE_ORGANIZATION_GENERATION,
    },
    TemplateInfo {
        key: "OUTLINE_CREATE",
        name: "初始大纲生成",
        category: "大纲生成",
        description: "根据项目信息生成完整的章节大纲",
        parameters: &[
            "title",
            "theme",
            "genre",
            "chapter_count",
            "narrative_perspective",
            "target_words",
            "time_period",
            "location",
            "atmosphere",
            "rules",
            "characters_info",
            "requirements",
            "mcp_references",
        ],
        content: OUTLINE_CREATE,
    },
    TemplateInfo {
        key: "OUTLINE_CONTINUE",
        name: "大纲续写",
        category: "大纲生成",
        description: "基于已有章节续写大纲",
        parameters: &[
            "title",
            "theme",
            "genre",
            "narrative_perspective",
            "chapter_count",
            "time_period",
            "location",
            "atmosphere",
            "rules",
            "characters_info",
            "current_chapter_count",
            "all_chapters_brief",
            "recent_plot",
            "memory_context",
            "mcp_references",
            "plot_stage_instruction",
            "start_chapter",
            "end_chapter",
            "story_direction",
            "requirements",
        ],
        content: OUTLINE_CONTINUE,
    },
    TemplateInfo {
        key: "CHAPTER_GENERATION_V2",
        name: "章节创作V2（首章）",
        category: "章节创作",
        description: "根据大纲创作章节内容（用于第1章，无前置章节）",
        parameters: &[
            "project_title",
            "genre",
            "chapter_number",
            "chapter_title",
            "chapter_outline",
            "target_word_count",
            "narrative_perspective",
            "characters_info",
        ],
        content: CHAPTER_GENERATION_V2,
    },
    TemplateInfo {
        key: "CHAPTER_GENERATION_V2_WITH_CONTEXT",
        name: "章节创作V2（续章）",
        category: "章节创作",
        description: "基于前置章节内容创作新章节（用于第2章及以后）",
        parameters: &[
            "project_title",
            "genre",
            "chapter_number",
            "chapter_title",
            "chapter_outline",
            "target_word_count",
            "narrative_perspective",
            "characters_info",
            "continuation_point",
            "relevant_memories",
            "story_skeleton",
        ],
        content: CHAPTER_GENERATION_V2_WITH_CONTEXT,
    },
    TemplateInfo {
        key: "CHAPTER_REGENERATION_SYSTEM",
        name: "章节重写系统提示",
        category: "章节重写",
        description: "用于章节重写的系统提示词",
        parameters: &[
            "chapter_number",
            "title",
            "word_count",
            "content",
            "modification_instructions",
            "project_context",
            "style_content",
            "target_word_count",
        ],
        content: CHAPTER_REGENERATION_SYSTEM,
    },
    TemplateInfo {
        key: "PLOT_ANALYSIS",
        name: "情节分析",
        category: "情节分析",
        description: "深度分析章节的剧情、钩子、伏笔等",
        parameters: &["chapter_number", "title", "content", "word_count"],
        content: PLOT_ANALYSIS,
    },
    TemplateInfo {
        key: "INSPIRATION_TITLE_SYSTEM",
        name: "灵感模式-书名生成",
        category: "灵感模式",
        description: "根据用户的原始想法生成6个书名建议",
        parameters: &["initial_idea"],
        content: INSPIRATION_TITLE_SYSTEM,
    },
    TemplateInfo {
        key: "INSPIRATION_QUICK_COMPLETE",
        name: "灵感模式-智能补全",
        category: "灵感模式",
        description: "根据用户提供的部分信息智能补全完整的小说方案",
        parameters: &["existing"],
        content: INSPIRATION_QUICK_COMPLETE,
    },
];

/// Look up a built-in template's content by key.
pub fn template_content(key: &str) -> Option<&'static str> {
    BUILTIN_TEMPLATES
        .iter()
        .find(|t| t.key == key)
        .map(|t| t.content)
}

/// Look up a built-in template's full catalog entry by key.
pub fn template_info(key: &str) -> Option<&'static TemplateInfo> {
    BUILTIN_TEMPLATES.iter().find(|t| t.key == key)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::extract_placeholders;

    #[test]
    fn catalog_keys_are_unique() {
        let mut keys: Vec<_> = BUILTIN_TEMPLATES.iter().map(|t| t.key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), BUILTIN_TEMPLATES.len());
    }

    #[test]
    fn lookup_known_key() {
        let content = template_content("WORLD_BUILDING").unwrap();
        assert!(content.contains("{title}"));
        assert!(content.contains("{genre_strategy}"));
    }

    #[test]
    fn lookup_unknown_key_returns_none() {
        assert!(template_content("NO_SUCH_TEMPLATE").is_none());
        assert!(template_info("NO_SUCH_TEMPLATE").is_none());
    }

    #[test]
    fn info_carries_metadata() {
        let info = template_info("PLOT_ANALYSIS").unwrap();
        assert_eq!(info.category, "情节分析");
        assert!(info.parameters.contains(&"chapter_number"));
    }

    #[test]
    fn declared_parameters_cover_template_placeholders() {
        // Every placeholder a template actually uses must be either a
        // declared parameter or the derived genre_strategy slot.
        for info in BUILTIN_TEMPLATES {
            for placeholder in extract_placeholders(info.content) {
                assert!(
                    placeholder == "genre_strategy"
                        || info.parameters.contains(&placeholder.as_str()),
                    "{}: undeclared placeholder {{{placeholder}}}",
                    info.key
                );
            }
        }
    }
}
