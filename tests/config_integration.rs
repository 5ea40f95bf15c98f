//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables.

use scenegraph::config::SceneGraphConfig;
use scenegraph::{SceneNode, Vec3, Mat4};
use serial_test::serial;

#[test]
#[serial]
fn test_env_override() {
    std::env::set_var("SG_SCENE__ROOT_NAME", "World From Env");
    let config = SceneGraphConfig::load().unwrap();
    std::env::remove_var("SG_SCENE__ROOT_NAME");

    assert_eq!(config.scene.root_name, "World From Env");
}

#[test]
#[serial]
fn test_env_override_numeric() {
    std::env::set_var("SG_SCENE__ROOT_ID", "77");
    std::env::set_var("SG_DEBUG__LOG_UPDATES", "true");
    let config = SceneGraphConfig::load();
    std::env::remove_var("SG_SCENE__ROOT_ID");
    std::env::remove_var("SG_DEBUG__LOG_UPDATES");

    let config = config.unwrap();
    assert_eq!(config.scene.root_id, 77);
    assert!(config.debug.log_updates);
}

#[test]
#[serial]
fn test_default_file_loading() {
    let cwd = std::env::current_dir().unwrap();
    assert!(cwd.join("config/default.toml").exists());

    let config = SceneGraphConfig::load().unwrap();
    assert!(!config.scene.root_name.is_empty());
    assert!(!config.debug.log_level.is_empty());
}

#[test]
#[serial]
fn test_bad_env_value_is_an_error() {
    std::env::set_var("SG_SCENE__ROOT_ID", "not-a-number");
    let result = SceneGraphConfig::load();
    std::env::remove_var("SG_SCENE__ROOT_ID");

    let err = result.unwrap_err();
    assert!(err.to_string().starts_with("Configuration error"));
}

#[test]
#[serial]
fn test_configured_scene_updates() {
    std::env::set_var("SG_SCENE__ROOT_NAME", "Stage");
    let config = SceneGraphConfig::load();
    std::env::remove_var("SG_SCENE__ROOT_NAME");
    let config = config.unwrap();

    let mut scene = config.scene.create_scene();
    let prop = scene
        .spawn(2, SceneNode::mesh("prop", 2).with_transform(Mat4::translation(Vec3::Y)))
        .unwrap();

    let mut observer = config.debug.observer();
    scene.update(1.0, &mut observer).unwrap();

    assert_eq!(scene.node(scene.root()).unwrap().name(), "Stage");
    assert_eq!(scene.node(prop).unwrap().world_transform().get_translation(), Vec3::Y);
}
