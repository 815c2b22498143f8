mod support;

use anyhow::Result;
use httpmock::prelude::*;
use golem_population::core::lotka_volterra::next_population;
use golem_population::server::api;
use serde_json::{json, Value};
use tempfile::TempDir;

#[tokio::test]
async fn test_health_and_parameters() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = support::test_config(&temp_dir, "http://127.0.0.1:9/taille");
    let server = support::spawn(api::build(&config).await?).await;
    let client = reqwest::Client::new();

    let health: Value = client.get(server.url("/health")).send().await?.json().await?;
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["service"], "Golem Population API");
    assert_eq!(health["port"], 16050);
    assert_eq!(health["group"], "F");
    assert_eq!(health["history_len"], 0);

    for path in ["/taille", "/population/taille"] {
        let body: Value = client.get(server.url(path)).send().await?.json().await?;
        assert_eq!(body, json!({"taille": 100.0, "species": "Golem"}));
    }

    for path in ["/taux_de_croissance", "/population/taux_de_croissance"] {
        let body: Value = client.get(server.url(path)).send().await?.json().await?;
        assert_eq!(body, json!({"taux_de_croissance": 0.5, "species": "Golem"}));
    }

    for path in ["/taux_de_competition", "/population/taux_de_competition"] {
        let body: Value = client.get(server.url(path)).send().await?.json().await?;
        assert_eq!(
            body,
            json!({"taux_de_competition": 0.2, "species_i": "Golem", "species_j": "Vampire"})
        );
    }

    Ok(())
}

#[tokio::test]
async fn test_step_with_online_rival() -> Result<()> {
    let rival = MockServer::start_async().await;
    let rival_mock = rival
        .mock_async(|when, then| {
            when.method(GET).path("/taille");
            then.status(200).json_body(json!({"taille": [400.0]}));
        })
        .await;

    let temp_dir = TempDir::new()?;
    let config = support::test_config(&temp_dir, &rival.url("/taille"));
    let server = support::spawn(api::build(&config).await?).await;
    let client = reqwest::Client::new();

    let step: Value = client
        .post(server.url("/simulation/step"))
        .send()
        .await?
        .json()
        .await?;

    rival_mock.assert_async().await;
    let expected = next_population(100.0, 400.0, 0.5, 1000.0, 0.2);
    assert_eq!(step["success"], true);
    assert_eq!(step["time_step"], 1);
    assert_eq!(step["vampire"], 400.0);
    assert_eq!(step["connected"], true);
    assert!((step["taille"].as_f64().unwrap() - expected).abs() < 1e-9);

    let state: Value = client.get(server.url("/simulation/state")).send().await?.json().await?;
    assert_eq!(state["time_step"], 1);
    assert_eq!(state["connected"], true);
    assert_eq!(state["populations"]["Vampire"], 0.0);

    let history: Value = client.get(server.url("/simulation/history")).send().await?.json().await?;
    assert_eq!(history["total_steps"], 1);
    assert_eq!(history["history"][0]["time"], 1);
    assert_eq!(history["history"][0]["populations"]["Vampire"], 400.0);

    Ok(())
}

#[tokio::test]
async fn test_offline_rival_uses_simulated_vampires() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = support::test_config(&temp_dir, "http://127.0.0.1:9/taille");
    let server = support::spawn(api::build(&config).await?).await;
    let client = reqwest::Client::new();

    let step: Value = client
        .post(server.url("/simulation/step"))
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(step["connected"], false);
    let vampire = step["vampire"].as_f64().unwrap();
    assert!((0.0..=1500.0).contains(&vampire));

    Ok(())
}

#[tokio::test]
async fn test_reset_and_database_stats() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = support::test_config(&temp_dir, "http://127.0.0.1:9/taille");
    let server = support::spawn(api::build(&config).await?).await;
    let client = reqwest::Client::new();

    for _ in 0..3 {
        client.post(server.url("/simulation/step")).send().await?;
    }

    let stats: Value = client.get(server.url("/database/stats")).send().await?.json().await?;
    assert_eq!(stats["records"], 3);
    assert_eq!(stats["database_path"], config.api.database_url.as_str());

    let reset: Value = client
        .post(server.url("/simulation/reset"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(reset, json!({"success": true, "message": "Reset done"}));

    let state: Value = client.get(server.url("/simulation/state")).send().await?.json().await?;
    assert_eq!(state["time_step"], 0);
    assert_eq!(state["taille"], 100.0);

    let stats: Value = client.get(server.url("/database/stats")).send().await?.json().await?;
    assert_eq!(stats["records"], 0);

    Ok(())
}

#[tokio::test]
async fn test_restart_recovers_from_database() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = support::test_config(&temp_dir, "http://127.0.0.1:9/taille");
    let client = reqwest::Client::new();

    let last_size = {
        let server = support::spawn(api::build(&config).await?).await;
        let mut last = Value::Null;
        for _ in 0..2 {
            last = client
                .post(server.url("/simulation/step"))
                .send()
                .await?
                .json()
                .await?;
        }
        last["taille"].as_f64().unwrap()
    };

    let server = support::spawn(api::build(&config).await?).await;
    let state: Value = client.get(server.url("/simulation/state")).send().await?.json().await?;

    assert_eq!(state["time_step"], 2);
    assert!((state["taille"].as_f64().unwrap() - last_size).abs() < 1e-9);

    Ok(())
}

#[tokio::test]
async fn test_wrong_method_is_rejected() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = support::test_config(&temp_dir, "http://127.0.0.1:9/taille");
    let server = support::spawn(api::build(&config).await?).await;

    let response = reqwest::get(server.url("/simulation/step")).await?;
    assert_eq!(response.status(), reqwest::StatusCode::METHOD_NOT_ALLOWED);

    Ok(())
}
