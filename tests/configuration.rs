// ABOUTME: Integration tests for standalone configuration of a container home.
// ABOUTME: Checks the ping component install, auto-deploys and context conflicts.

mod support;

use cargolift::configuration::*;
use cargolift::deploy::War;
use cargolift::registry::{ContainerDescriptor, ContainerRegistry};
use std::fs;
use support::RecordingFileHandler;

fn tomcat() -> ContainerDescriptor {
    ContainerRegistry::with_builtin()
        .get("tomcat")
        .unwrap()
        .clone()
}

#[test]
fn configure_installs_ping_component() {
    support::init_tracing();
    let temp = tempfile::tempdir().unwrap();
    let home = temp.path().join("home");

    StandaloneConfiguration::new(&home)
        .configure(&tomcat())
        .unwrap();

    assert!(home.join("cargocpc.war").is_file());
    let deployed = home.join("webapps").join("cargocpc.war");
    assert!(deployed.is_file());
    let entries = support::zip_entries(&deployed);
    assert!(entries.contains(&"index.html".to_string()));
}

#[test]
fn configure_deploys_listed_modules() {
    let temp = tempfile::tempdir().unwrap();
    let home = temp.path().join("home");
    let war = temp.path().join("shop.war");
    fs::write(&war, b"war").unwrap();

    let mut config = StandaloneConfiguration::new(&home);
    config.add_deployable(War::new(&war));
    config.add_deployable(War::new(&war).with_context("/"));
    config.configure(&tomcat()).unwrap();

    assert!(home.join("webapps/shop.war").is_file());
    assert!(home.join("webapps/ROOT.war").is_file());
}

#[test]
fn deployable_claiming_ping_context_is_rejected() {
    let temp = tempfile::tempdir().unwrap();
    let home = temp.path().join("home");
    let war = temp.path().join("mine.war");
    fs::write(&war, b"war").unwrap();

    let mut config = StandaloneConfiguration::new(&home);
    config.add_deployable(War::new(&war).with_context(CPC_CONTEXT));

    let err = config.configure(&tomcat()).unwrap_err();
    assert!(matches!(err, ConfigurationError::Deploy(ref e) if e.is_conflict()));
}

#[test]
fn configure_goes_through_the_file_handler() {
    let temp = tempfile::tempdir().unwrap();
    let home = temp.path().join("home");
    let files = RecordingFileHandler::new();

    StandaloneConfiguration::new(&home)
        .with_file_handler(files.clone())
        .configure(&tomcat())
        .unwrap();

    let calls = files.calls();
    assert_eq!(calls[0], format!("mkdirs {}", home.display()));
    assert!(calls.contains(&format!("write {}", home.join("cargocpc.war").display())));
    assert!(calls.iter().any(|c| c.starts_with("copy_file") && c.ends_with("cargocpc.war")));
}

#[test]
fn cpc_url_follows_properties() {
    let mut config = StandaloneConfiguration::new("/tmp/unused");
    assert_eq!(cpc_url(&config), "http://localhost:8080/cargocpc/index.html");

    config.set_property(SERVLET_PORT, "9090");
    config.set_property(HOSTNAME, "127.0.0.1");
    assert_eq!(cpc_url(&config), "http://127.0.0.1:9090/cargocpc/index.html");
    assert_eq!(rmi_port(&config), "1099");
}
