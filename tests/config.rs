// ABOUTME: Integration tests for configuration parsing and validation.
// ABOUTME: Tests YAML parsing, env var interpolation, and building containers.

use cargolift::config::*;
use cargolift::configuration::{LocalConfiguration, SERVLET_PORT};
use cargolift::container::State;
use cargolift::deploy::{Deployable, DeployableType};
use cargolift::error::Error;
use cargolift::registry::ContainerRegistry;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

mod parsing {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let yaml = r#"
container: tomcat
home: /srv/tomcat
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.container.as_str(), "tomcat");
        assert_eq!(config.timeout, Duration::from_secs(120));
        assert_eq!(config.stop_grace, Duration::from_secs(5));
        assert!(!config.append);
        assert!(config.deployables.is_empty());
        assert!(config.start.is_none());
    }

    #[test]
    fn parse_full_config() {
        let yaml = r#"
container: jboss
home: target/jboss
output: target/jboss.log
append: true
timeout: 3m
stop_grace: 2s

properties:
  cargo.servlet.port: "8280"
  cargo.rmi.port:
    env: RMI_PORT
    default: "1199"

start:
  program: bin/run.sh
  args: ["-b", "${cargo.hostname}"]
  env:
    JAVA_OPTS: -Xmx512m
stop:
  program: bin/shutdown.sh

deployables:
  - type: war
    path: target/shop.war
    context: /store
  - type: ear
    path: target/billing.ear
    name: billing
  - type: sar
    path: target/svc.sar
    expanded: true

deploy_expanded:
  war: false
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(180));
        assert_eq!(config.stop_grace, Duration::from_secs(2));
        assert!(config.append);
        assert_eq!(
            config.properties.get("cargo.servlet.port"),
            Some(&EnvValue::Literal("8280".to_string()))
        );
        let start = config.start.as_ref().unwrap();
        assert_eq!(start.args, vec!["-b", "${cargo.hostname}"]);
        assert_eq!(start.env.get("JAVA_OPTS").map(String::as_str), Some("-Xmx512m"));
        assert_eq!(config.deployables.len(), 3);
        assert_eq!(config.deployables[0].kind, DeployableType::War);
        assert_eq!(config.deployables[0].context.as_deref(), Some("/store"));
        assert_eq!(config.deployables[2].expanded, Some(true));
        assert_eq!(config.deploy_expanded.get(&DeployableType::War), Some(&false));
    }

    #[test]
    fn invalid_container_id_returns_error() {
        let yaml = r#"
container: Tomcat
home: /srv
"#;
        assert!(matches!(Config::from_yaml(yaml), Err(Error::Yaml(_))));
    }

    #[test]
    fn missing_home_returns_error() {
        assert!(Config::from_yaml("container: tomcat\n").is_err());
    }

    #[test]
    fn unknown_deployable_type_returns_error() {
        let yaml = r#"
container: tomcat
home: /srv
deployables:
  - type: jar
    path: a.jar
"#;
        assert!(Config::from_yaml(yaml).is_err());
    }
}

mod discovery {
    use super::*;

    #[test]
    fn discovers_yml_and_resolves_relative_paths() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(
            temp.path().join(CONFIG_FILENAME),
            "container: jetty\nhome: build/jetty\noutput: build/jetty.log\ndeployables:\n  - type: war\n    path: app.war\n",
        )
        .unwrap();

        let config = Config::discover(temp.path()).unwrap();
        assert_eq!(config.home, temp.path().join("build/jetty"));
        assert_eq!(config.output, Some(temp.path().join("build/jetty.log")));
        assert_eq!(config.deployables[0].path, temp.path().join("app.war"));
    }

    #[test]
    fn discovers_config_in_dot_directory() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(temp.path().join(".cargolift")).unwrap();
        std::fs::write(
            temp.path().join(CONFIG_FILENAME_DIR),
            "container: resin\nhome: /srv/resin\n",
        )
        .unwrap();

        let config = Config::discover(temp.path()).unwrap();
        assert_eq!(config.container.as_str(), "resin");
        assert_eq!(config.home, Path::new("/srv/resin"));
    }

    #[test]
    fn missing_config_is_reported() {
        let temp = tempfile::tempdir().unwrap();
        assert!(matches!(
            Config::discover(temp.path()),
            Err(Error::ConfigNotFound(_))
        ));
    }
}

mod env_values {
    use super::*;

    #[test]
    fn resolves_literals_env_and_defaults() {
        let mut env_map = BTreeMap::new();
        env_map.insert("KEY".to_string(), EnvValue::Literal("literal".to_string()));
        env_map.insert(
            "FROM_ENV".to_string(),
            EnvValue::FromEnv {
                var: "CARGOLIFT_TEST_VAR".to_string(),
                default: None,
            },
        );
        env_map.insert(
            "WITH_DEFAULT".to_string(),
            EnvValue::FromEnv {
                var: "CARGOLIFT_TEST_UNSET".to_string(),
                default: Some(EnvDefault::Text("default_value".to_string())),
            },
        );

        temp_env::with_vars(
            [
                ("CARGOLIFT_TEST_VAR", Some("from_environment")),
                ("CARGOLIFT_TEST_UNSET", None),
            ],
            || {
                let resolved = resolve_env_map(&env_map).unwrap();
                assert_eq!(resolved.get("KEY"), Some(&"literal".to_string()));
                assert_eq!(
                    resolved.get("FROM_ENV"),
                    Some(&"from_environment".to_string())
                );
                assert_eq!(
                    resolved.get("WITH_DEFAULT"),
                    Some(&"default_value".to_string())
                );
            },
        );
    }

    #[test]
    fn missing_env_var_without_default_fails() {
        temp_env::with_var("CARGOLIFT_TEST_MISSING", None::<&str>, || {
            let value = EnvValue::FromEnv {
                var: "CARGOLIFT_TEST_MISSING".to_string(),
                default: None,
            };
            assert!(matches!(value.resolve(), Err(Error::MissingEnvVar(v)) if v == "CARGOLIFT_TEST_MISSING"));
        });
    }

    #[test]
    fn env_backed_port_reaches_the_configuration() {
        let yaml = r#"
container: tomcat
home: /srv/tomcat
properties:
  cargo.servlet.port:
    env: CARGOLIFT_TEST_PORT
"#;
        temp_env::with_var("CARGOLIFT_TEST_PORT", Some("9191"), || {
            let configuration = Config::from_yaml(yaml).unwrap().configuration().unwrap();
            assert_eq!(configuration.property(SERVLET_PORT), Some("9191"));
            assert_eq!(configuration.property("cargo.hostname"), Some("localhost"));
        });
    }
}

mod building {
    use super::*;

    #[test]
    fn deployable_entries_become_typed_deployables() {
        let yaml = r#"
container: jboss
home: /srv/jboss
deployables:
  - type: war
    path: /build/shop.war
    context: /store
  - type: ear
    path: /build/missing.ear
    name: billing
  - type: rar
    path: /build/jca.rar
"#;
        let deployables = Config::from_yaml(yaml).unwrap().deployables().unwrap();
        match &deployables[0] {
            Deployable::War(war) => assert_eq!(war.context().as_str(), "store"),
            other => panic!("expected WAR, got {other:?}"),
        }
        match &deployables[1] {
            Deployable::Ear(ear) => {
                assert_eq!(ear.name(), Some("billing"));
                assert!(ear.web_contexts().is_empty());
            }
            other => panic!("expected EAR, got {other:?}"),
        }
        assert_eq!(deployables[2].kind(), DeployableType::Rar);
        assert!(!deployables[2].is_expanded());
    }

    #[test]
    fn container_requires_start_command() {
        let config = Config::from_yaml("container: tomcat\nhome: /srv\n").unwrap();
        let result = config.container(&ContainerRegistry::with_builtin());
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn unknown_container_is_rejected() {
        let config = Config::from_yaml(
            "container: websphere\nhome: /srv\nstart:\n  program: run.sh\n",
        )
        .unwrap();
        let result = config.container(&ContainerRegistry::with_builtin());
        assert!(matches!(result, Err(Error::Registry(_))));
    }

    #[test]
    fn container_carries_settings() {
        let config = Config::from_yaml(
            "container: tomcat\nhome: /srv\ntimeout: 0s\nappend: true\noutput: /tmp/t.log\nstart:\n  program: run.sh\n",
        )
        .unwrap();
        let container = config.container(&ContainerRegistry::with_builtin()).unwrap();
        assert_eq!(container.state(), State::Unknown);
        assert_eq!(container.timeout(), Duration::ZERO);
        assert!(container.output().append);
        assert_eq!(container.output().path.as_deref(), Some(Path::new("/tmp/t.log")));
        assert_eq!(container.descriptor().name(), "Apache Tomcat");
    }
}

mod init {
    use super::*;

    #[test]
    fn template_parses_back() {
        let temp = tempfile::tempdir().unwrap();
        init_config(temp.path(), Some("jetty"), false).unwrap();
        let config = Config::discover(temp.path()).unwrap();
        assert_eq!(config.container.as_str(), "jetty");
        assert_eq!(config.timeout, Duration::from_secs(120));
        assert!(config.start.is_some());
    }

    #[test]
    fn init_refuses_overwrite_without_force() {
        let temp = tempfile::tempdir().unwrap();
        init_config(temp.path(), None, false).unwrap();
        assert!(matches!(
            init_config(temp.path(), None, false),
            Err(Error::AlreadyExists(_))
        ));
        assert!(init_config(temp.path(), None, true).is_ok());
    }

    #[test]
    fn init_rejects_invalid_container() {
        let temp = tempfile::tempdir().unwrap();
        assert!(matches!(
            init_config(temp.path(), Some("Bad Name"), false),
            Err(Error::InvalidConfig(_))
        ));
    }
}
