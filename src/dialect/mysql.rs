use super::{Dialect, EngineMode};

/// MySQL / MariaDB dialect.
pub struct MysqlDialect;

impl Dialect for MysqlDialect {
    fn mode(&self) -> EngineMode {
        EngineMode::Mysql
    }

    fn quote_pair(&self) -> (char, char) {
        ('`', '`')
    }

    fn escape_string(&self, value: &str) -> String {
        // Same set as mysql_real_escape_string.
        let mut out = String::with_capacity(value.len() + 2);
        out.push('\'');
        for c in value.chars() {
            match c {
                '\0' => out.push_str("\\0"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\\' => out.push_str("\\\\"),
                '\'' => out.push_str("\\'"),
                '"' => out.push_str("\\\""),
                '\x1a' => out.push_str("\\Z"),
                c => out.push(c),
            }
        }
        out.push('\'');
        out
    }

    fn isnull_function(&self) -> &'static str {
        "IFNULL"
    }

    fn substr_function(&self) -> &'static str {
        "SUBSTRING"
    }

    fn begin_statement(&self) -> &'static str {
        "START TRANSACTION"
    }

    fn backslash_escapes(&self) -> bool {
        true
    }
}
