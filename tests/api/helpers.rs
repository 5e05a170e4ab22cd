use statusac::configuration::{
    ApplicationSettings, CorsSettings, ProbeMethod, ProbeSettings, Settings,
};
use statusac::startup::Application;

pub const TEST_ORIGIN: &str = "http://localhost:3000";

pub struct TestApp {
    pub port: u16,
    client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(test_settings()).await
    }

    pub async fn spawn_with(settings: Settings) -> Self {
        let application = Application::build(settings)
            .await
            .expect("Failed to build application");
        let port = application.port();

        // The listener is already bound, so requests queue until the server runs.
        tokio::spawn(application.run_until_stopped());

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        Self { port, client }
    }

    pub fn get_client(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn get_url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }

    pub async fn post_check(&self, url: &str) -> reqwest::Response {
        self.client
            .post(self.get_url("/check"))
            .form(&[("url", url)])
            .send()
            .await
            .expect("Failed to execute request")
    }
}

/// Settings for a test instance: random port, 1 second probe timeout.
pub fn test_settings() -> Settings {
    Settings {
        application: ApplicationSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        probe: ProbeSettings {
            method: ProbeMethod::Get,
            follow_redirects: true,
            max_redirects: 10,
            timeout_seconds: 1,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string(),
            accept: "*/*".to_string(),
        },
        cors: CorsSettings {
            allowed_origins: vec![TEST_ORIGIN.to_string()],
        },
    }
}
