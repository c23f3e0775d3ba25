use std::cmp::Ordering;

/// Extensions accepted as chapter pages.
pub const PAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "webp", "gif", "avif"];

pub fn is_page_image(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| PAGE_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Compare file names the way people number pages: digit runs by value,
/// everything else case-insensitively, so `2.png` sorts before `10.png`.
/// Names that differ only in zero padding put the shorter one first.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    human_sort::compare(&a.to_ascii_lowercase(), &b.to_ascii_lowercase())
        .then_with(|| a.len().cmp(&b.len()))
}

/// Sort pages in reading order by the name `key` returns.
pub fn sort_pages<T, F>(pages: &mut [T], key: F)
where
    F: Fn(&T) -> &str,
{
    pages.sort_by(|a, b| natural_cmp(key(a), key(b)));
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_natural_cmp() {
        let mut names = vec!["10.png", "2.png", "1.png", "page-11.jpg", "page-9.jpg", "001.png"];
        names.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(
            names,
            vec!["1.png", "001.png", "2.png", "10.png", "page-9.jpg", "page-11.jpg"]
        );
    }

    #[test]
    fn test_natural_cmp_case_insensitive() {
        assert_eq!(natural_cmp("Page2", "page10"), Ordering::Less);
        assert_eq!(natural_cmp("a", "A"), Ordering::Equal);
        assert_eq!(natural_cmp("a", "ab"), Ordering::Less);
    }

    #[test]
    fn test_is_page_image() {
        assert!(is_page_image("001.PNG"));
        assert!(is_page_image("cover.webp"));
        assert!(!is_page_image("notes.txt"));
        assert!(!is_page_image("README"));
    }

    #[test]
    fn test_sort_pages_by_key() {
        let mut pages = vec![("c", "12.jpg"), ("a", "3.jpg"), ("b", "07.jpg")];
        sort_pages(&mut pages, |page| page.1);
        let order: Vec<&str> = pages.iter().map(|(id, _)| *id).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }
}
