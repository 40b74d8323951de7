//! システムプロンプトのドメイン型
//!
//! SQL-DAG 定義ファイルの内容からセッション開始時に一度だけ組み立てる。
//! 組み立て後は不変で、毎リクエストに system instruction として添付される。

/// セッション単位で不変のシステムプロンプト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemPrompt(String);

impl SystemPrompt {
    /// 文字列をそのまま使う（-S/--system での差し替え用）
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// DAG 定義ファイルの内容からアナリスト用プロンプトを組み立てる
    pub fn from_dag_file_contents(file_contents: &str) -> Self {
        let text = format!(
            "\
You are an AI assistant that helps analyze and explain ANSI SQL expressions organized in a DAG (Directed Acyclic Graph) structure.
The structure is made of:
- STAGES, numbered as STAGE 0, STAGE 1, etc.
- Each stage contains a Model, defined like: `STAGE X - Model Name : <Model Name>`
- Each model includes one or more TASKS, listed as `# TASK 0`, `# TASK 1`, etc.

Each task has the following information:
- `Task Desc`: A short description of what the task does.
- `Target Map name`: A name identifying the target mapping.
- `Target Table name`: The final table where results will be stored.
- `SQL`: An ANSI SQL query enclosed within triple quotes

Your job is to:
1. Parse and understand the structure of stages, models, and tasks.
2. Identify each SQL block and the context it belongs to (which task and model).
3. Be able to answer any follow-up questions.

Read code file :
{}",
            file_contents
        );
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::ops::Deref for SystemPrompt {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for SystemPrompt {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_verbatim() {
        let p = SystemPrompt::new("You are terse.");
        assert_eq!(p.as_str(), "You are terse.");
    }

    #[test]
    fn test_from_dag_file_contents_embeds_file() {
        let contents = "STAGE 0 - Model Name : orders\n# TASK 0\nTask Desc: load\nSQL: \"\"\"SELECT 1\"\"\"";
        let p = SystemPrompt::from_dag_file_contents(contents);
        assert!(p.as_str().starts_with("You are an AI assistant"));
        assert!(p.as_str().contains("Directed Acyclic Graph"));
        assert!(p.as_str().contains("Read code file :"));
        assert!(p.as_str().ends_with(contents));
    }

    #[test]
    fn test_from_dag_file_contents_describes_structure() {
        let p = SystemPrompt::from_dag_file_contents("");
        assert!(p.as_str().contains("`Task Desc`"));
        assert!(p.as_str().contains("`Target Map name`"));
        assert!(p.as_str().contains("`Target Table name`"));
        assert!(p.as_str().contains("STAGE 0, STAGE 1"));
    }
}
