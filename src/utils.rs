/// Object key utility functions / 对象键处理工具函数

/// Strip the queried prefix from the start of a key, once / 去掉键开头的查询前缀（仅一次）
///
/// Keys that do not start with the prefix are returned unchanged.
pub fn strip_query_prefix<'a>(key: &'a str, prefix: &str) -> &'a str {
    key.strip_prefix(prefix).unwrap_or(key)
}

/// Name of a listed key relative to the queried prefix / 列举条目相对查询前缀的名称
///
/// A prefix given without its trailing / also loses the separator, so "docs",
/// "docs/" and "/docs/" all turn "docs/a.txt" into "a.txt".
pub fn relative_name<'a>(key: &'a str, prefix: &str) -> &'a str {
    let prefix = if key.starts_with('/') { prefix } else { prefix.trim_start_matches('/') };
    let name = strip_query_prefix(key, prefix);
    if !prefix.is_empty() && !prefix.ends_with('/') && name.len() < key.len() {
        name.strip_prefix('/').unwrap_or(name)
    } else {
        name
    }
}

/// Directory marker key: prefix + dirname, always ending with / / 目录占位键
pub fn dir_key(prefix: &str, dirname: &str) -> String {
    let mut key = format!("{}{}", prefix, dirname);
    if !key.ends_with('/') {
        key.push('/');
    }
    key
}

/// Normalize a listing prefix for delimiter based listing / 规范化列举前缀
/// 1. Drop leading / (object keys never start with one) / 去掉开头的 /
/// 2. Non-empty prefixes end with / / 非空前缀以 / 结尾
pub fn normalize_prefix(prefix: &str) -> String {
    let p = prefix.trim_start_matches('/');
    if p.is_empty() || p.ends_with('/') {
        p.to_string()
    } else {
        format!("{}/", p)
    }
}

/// URL-encode an object key, keeping / separators / 对象键URL编码，保留 /
pub fn encode_key(key: &str) -> String {
    key.split('/')
        .map(|seg| urlencoding::encode(seg).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Public URL of an uploaded object / 上传对象的公开地址
/// Plain concatenation: the configured domain carries its own trailing /
pub fn public_url(domain: &str, prefix: &str, filename: &str) -> String {
    format!("{}{}{}", domain, prefix, filename)
}

/// Domain to report: custom domain, else API address + / / 对外域名
pub fn resolve_domain(custom: &str, api_address: &str) -> String {
    if custom.is_empty() {
        format!("{}/", api_address.trim_end_matches('/'))
    } else {
        custom.to_string()
    }
}

/// Constant-time string comparison / 常量时间比较
pub fn secure_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_query_prefix() {
        assert_eq!(strip_query_prefix("docs/a.txt", "docs/"), "a.txt");
        assert_eq!(strip_query_prefix("docs/sub/", "docs/"), "sub/");
        assert_eq!(strip_query_prefix("a.txt", ""), "a.txt");
        // only the leading occurrence / 只去掉开头
        assert_eq!(strip_query_prefix("x/docs/a", "docs/"), "x/docs/a");
        assert_eq!(strip_query_prefix("docs/docs/a", "docs/"), "docs/a");
    }

    #[test]
    fn test_relative_name() {
        assert_eq!(relative_name("docs/a.txt", "docs/"), "a.txt");
        assert_eq!(relative_name("docs/a.txt", "docs"), "a.txt");
        assert_eq!(relative_name("docs/", "docs"), "");
        assert_eq!(relative_name("docs-old.txt", "docs"), "-old.txt");
        assert_eq!(relative_name("docs/a.txt", "/docs/"), "a.txt");
        assert_eq!(relative_name("/docs/a.txt", "/docs/"), "a.txt");
        assert_eq!(relative_name("/a.txt", ""), "/a.txt");
    }

    #[test]
    fn test_dir_key() {
        assert_eq!(dir_key("docs/", "new"), "docs/new/");
        assert_eq!(dir_key("docs/", "new/"), "docs/new/");
        assert_eq!(dir_key("", "top"), "top/");
    }

    #[test]
    fn test_normalize_prefix() {
        assert_eq!(normalize_prefix(""), "");
        assert_eq!(normalize_prefix("/"), "");
        assert_eq!(normalize_prefix("docs"), "docs/");
        assert_eq!(normalize_prefix("/docs/"), "docs/");
    }

    #[test]
    fn test_encode_key() {
        assert_eq!(encode_key("docs/a b.txt"), "docs/a%20b.txt");
        assert_eq!(encode_key("图片/1.png"), "%E5%9B%BE%E7%89%87/1.png");
        assert_eq!(encode_key("dir/"), "dir/");
    }

    #[test]
    fn test_public_url() {
        assert_eq!(
            public_url("https://cdn.example.com/", "docs/", "a.txt"),
            "https://cdn.example.com/docs/a.txt"
        );
    }

    #[test]
    fn test_resolve_domain() {
        assert_eq!(resolve_domain("", "https://b.cos.ap-nanjing.myqcloud.com"), "https://b.cos.ap-nanjing.myqcloud.com/");
        assert_eq!(resolve_domain("https://cdn/", "https://api"), "https://cdn/");
    }

    #[test]
    fn test_secure_eq() {
        assert!(secure_eq("token", "token"));
        assert!(!secure_eq("token", "tokem"));
        assert!(!secure_eq("token", "tok"));
        assert!(!secure_eq("", "token"));
    }
}
