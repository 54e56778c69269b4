use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str = "[{elapsed_precise} / {eta_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}";

pub fn progress_bar(len: u64, msg: String) -> ProgressBar {
    let bar = ProgressBar::new(len);

    // The template is static, so a bad one falls back to the default bar
    if let Ok(style) = ProgressStyle::default_bar().template(TEMPLATE) {
        bar.set_style(style.progress_chars("##-"));
    }
    bar.set_message(msg);

    bar
}

#[cfg(test)]
mod tests {
    use super::progress_bar;

    #[test]
    fn test_progress_bar_tracks_length() {
        let bar = progress_bar(3, "Replaying".to_string());
        bar.inc(2);

        assert_eq!(bar.length(), Some(3));
        assert_eq!(bar.position(), 2);
        assert_eq!(bar.message(), "Replaying");
    }
}
