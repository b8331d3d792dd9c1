//! Terminal stand-ins for the rendering surface, shell, prompt and opener

use clap::ValueEnum;
use parking_lot::Mutex;
use std::io::Write;
use std::sync::{OnceLock, Weak};
use url::Url;

use wikiview_core::{
    DisplayHint, ExternalPrompt, LinkOpener, NavigationController, PageTitle, PromptChoice,
    RenderSurface, ShellMessage, UiShell, WikiApi,
};

type LoadHook = Box<dyn Fn(&str) + Send + Sync>;

/// Prints what a web view would load and keeps a back stack.
#[derive(Default)]
pub struct ConsoleSurface {
    history: Mutex<Vec<String>>,
    on_load: OnceLock<LoadHook>,
}

impl ConsoleSurface {
    /// Report every load to `controller` as page started/finished events,
    /// the way a web view would once the document is in.
    pub fn report_to<A: WikiApi + 'static>(&self, controller: Weak<NavigationController<A>>) {
        self.on_load(move |url| {
            if let Some(controller) = controller.upgrade() {
                controller.on_page_started(url);
                controller.on_page_finished(url, &title_from_url(url).unwrap_or_default());
            }
        });
    }

    /// Install the load hook. Only the first call takes effect.
    fn on_load(&self, hook: impl Fn(&str) + Send + Sync + 'static) {
        if self.on_load.set(Box::new(hook)).is_err() {
            tracing::debug!("Console surface load hook already set");
        }
    }

    fn show(&self, url: &str) {
        println!("→ {}", url);
        if let Some(hook) = self.on_load.get() {
            hook(url);
        }
    }
}

impl RenderSurface for ConsoleSurface {
    fn load_url(&self, url: &str) {
        self.history.lock().push(url.to_string());
        self.show(url);
    }

    fn can_go_back(&self) -> bool {
        self.history.lock().len() > 1
    }

    fn go_back(&self) {
        let previous = {
            let mut history = self.history.lock();
            history.pop();
            history.last().cloned()
        };
        if let Some(url) = previous {
            self.show(&url);
        }
    }

    fn reload(&self) {
        let current = self.history.lock().last().cloned();
        match current {
            Some(url) => self.show(&url),
            None => println!("Nothing to reload"),
        }
    }

    fn apply_display_hint(&self, hint: DisplayHint) {
        println!(
            "  (zoom {}%, wide viewport: {}, overview: {})",
            hint.initial_scale_percent, hint.wide_viewport, hint.overview_mode
        );
    }
}

/// `title` query parameter of a page URL, if present.
fn title_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == "title")
        .map(|(_, value)| value.into_owned())
}

pub struct ConsoleShell {
    max_results: usize,
    results: Mutex<Vec<PageTitle>>,
    search_enabled: Mutex<bool>,
}

impl ConsoleShell {
    pub fn new(max_results: usize) -> Self {
        Self {
            max_results,
            results: Mutex::new(Vec::new()),
            search_enabled: Mutex::new(false),
        }
    }

    /// 1-based index into the last printed result list.
    pub fn nth_result(&self, n: usize) -> Option<PageTitle> {
        n.checked_sub(1)
            .and_then(|i| self.results.lock().get(i).cloned())
    }
}

impl UiShell for ConsoleShell {
    fn show_titles(&self, titles: &[PageTitle]) {
        *self.results.lock() = titles.to_vec();

        if !*self.search_enabled.lock() {
            println!("Title list is not available yet");
            return;
        }
        if titles.is_empty() {
            return;
        }

        for (i, title) in titles.iter().take(self.max_results).enumerate() {
            println!("{:>4}. {}", i + 1, title);
        }
        if titles.len() > self.max_results {
            println!("      … {} more", titles.len() - self.max_results);
        }
    }

    fn show_message(&self, message: ShellMessage) {
        println!("{}", message.text());
    }

    fn set_search_enabled(&self, enabled: bool) {
        let mut current = self.search_enabled.lock();
        if enabled && !*current {
            println!("Search ready, type to filter page titles");
        }
        *current = enabled;
    }

    fn set_page_title(&self, title: &str) {
        println!("  [{}]", title);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExternalPolicy {
    /// Ask on the terminal for every external link
    Ask,
    Always,
    Never,
}

pub struct ConsolePrompt {
    policy: ExternalPolicy,
}

impl ConsolePrompt {
    pub fn new(policy: ExternalPolicy) -> Self {
        Self { policy }
    }
}

impl ExternalPrompt for ConsolePrompt {
    fn confirm_external(&self, url: &str) -> PromptChoice {
        match self.policy {
            ExternalPolicy::Always => PromptChoice::OpenExternally,
            ExternalPolicy::Never => PromptChoice::Cancel,
            ExternalPolicy::Ask => {
                print!("{} leaves the wiki. Open externally? [y/N] ", url);
                let _ = std::io::stdout().flush();

                let mut answer = String::new();
                match std::io::stdin().read_line(&mut answer) {
                    Ok(_) if answer.trim().eq_ignore_ascii_case("y") => {
                        PromptChoice::OpenExternally
                    }
                    _ => PromptChoice::Cancel,
                }
            }
        }
    }
}

/// Prints the URL for the user to open; launching a browser is left to them.
pub struct PrintOpener;

impl LinkOpener for PrintOpener {
    fn open(&self, url: &str) -> wikiview_core::Result<()> {
        println!("Open in your browser: {}", url);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use wikiview_core::{Collaborators, Config};

    #[test]
    fn test_title_from_url() {
        assert_eq!(
            title_from_url("https://wiki.example.org/w/index.php?title=Apple+Pie&useskin=minerva"),
            Some("Apple Pie".to_string())
        );
        assert_eq!(title_from_url("https://wiki.example.org/wiki/Home"), None);
    }

    #[test]
    fn test_surface_back_stack() {
        let surface = ConsoleSurface::default();
        let shown = Arc::new(Mutex::new(Vec::new()));
        surface.on_load({
            let shown = shown.clone();
            move |url| shown.lock().push(url.to_string())
        });
        assert!(!surface.can_go_back());

        surface.load_url("https://wiki.example.org/a");
        surface.load_url("https://wiki.example.org/b");
        assert!(surface.can_go_back());

        surface.go_back();
        assert!(!surface.can_go_back());
        assert_eq!(
            *shown.lock(),
            vec![
                "https://wiki.example.org/a",
                "https://wiki.example.org/b",
                "https://wiki.example.org/a",
            ]
        );
    }

    #[test]
    fn test_loads_reach_the_controller() {
        let surface = Arc::new(ConsoleSurface::default());
        let collaborators = Collaborators {
            surface: surface.clone(),
            shell: Arc::new(ConsoleShell::new(5)),
            prompt: Arc::new(ConsolePrompt::new(ExternalPolicy::Never)),
            opener: Arc::new(PrintOpener),
        };
        let controller = Arc::new(
            NavigationController::connect(Config::new("https://wiki.example.org/w"), collaborators)
                .unwrap(),
        );
        surface.report_to(Arc::downgrade(&controller));

        assert!(controller.on_title_selected("Apple Pie"));

        // no further input needed for the page events to land
        let page = controller.session().current_page().unwrap();
        assert!(!page.loading);
        assert_eq!(page.title, "Apple Pie");
        assert!(page.url.contains("useskin=minerva"));
    }

    #[test]
    fn test_nth_result() {
        let shell = ConsoleShell::new(10);
        shell.set_search_enabled(true);
        shell.show_titles(&[PageTitle::new("A").unwrap(), PageTitle::new("B").unwrap()]);

        assert_eq!(shell.nth_result(2).unwrap(), "B");
        assert!(shell.nth_result(0).is_none());
        assert!(shell.nth_result(3).is_none());
    }

    #[test]
    fn test_prompt_policies() {
        assert_eq!(
            ConsolePrompt::new(ExternalPolicy::Always).confirm_external("https://a.test/"),
            PromptChoice::OpenExternally
        );
        assert_eq!(
            ConsolePrompt::new(ExternalPolicy::Never).confirm_external("https://a.test/"),
            PromptChoice::Cancel
        );
    }
}
