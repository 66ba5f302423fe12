pub mod time_parser;

pub use time_parser::TimeParser;

/// 短码字符集（大小写字母 + 数字，共 62 个）
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    iter::repeat_with(|| CODE_ALPHABET[rand::random_range(0..CODE_ALPHABET.len())] as char)
        .take(length)
        .collect()
}

/// 短码生成器
///
/// 注册表通过它获取候选短码，测试可以注入固定序列来覆盖重试路径。
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

#[derive(Debug, Clone, Copy)]
pub struct RandomCodeGenerator {
    length: usize,
}

impl RandomCodeGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Default for RandomCodeGenerator {
    fn default() -> Self {
        Self::new(6)
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        generate_random_code(self.length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabet_has_62_distinct_chars() {
        let mut chars = CODE_ALPHABET.to_vec();
        chars.sort_unstable();
        chars.dedup();
        assert_eq!(chars.len(), 62);
    }

    #[test]
    fn test_generated_codes_use_alphabet() {
        let generator = RandomCodeGenerator::default();
        for _ in 0..500 {
            let code = generator.generate();
            assert_eq!(code.len(), 6);
            assert!(
                code.bytes().all(|b| CODE_ALPHABET.contains(&b)),
                "unexpected code {}",
                code
            );
        }
    }

    #[test]
    fn test_custom_length() {
        assert_eq!(generate_random_code(10).len(), 10);
        assert_eq!(generate_random_code(0), "");
    }
}
