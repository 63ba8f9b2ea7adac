use tessera_runtime::{Terrain, TerrainConfig};

#[test]
fn defaults_match_the_stock_grid() {
    let cfg = TerrainConfig::default();
    assert_eq!(cfg.patches_per_edge, 16);
    assert_eq!(cfg.patch_size, 16);
    assert_eq!(cfg.vertex_spacing_x, 1.0);
    assert_eq!(cfg.vertex_spacing_y, 1.0);
    assert!((cfg.uv_scale - 0.13).abs() < 1e-7);
    assert_eq!(cfg.height_change_epsilon, 1e-3);
    assert!(!cfg.require_loaded_neighbors);
    assert_eq!(cfg.texture_layers, 4);
    assert!(cfg.validate().is_ok());
}

#[test]
fn empty_toml_gives_defaults() {
    assert_eq!(TerrainConfig::from_toml_str("").unwrap(), TerrainConfig::default());
}

#[test]
fn partial_toml_overrides_named_fields() {
    let cfg = TerrainConfig::from_toml_str(
        r#"
        patches_per_edge = 4
        vertex_spacing_x = 2.5
        require_loaded_neighbors = true
        "#,
    )
    .unwrap();
    assert_eq!(cfg.patches_per_edge, 4);
    assert_eq!(cfg.vertex_spacing_x, 2.5);
    assert!(cfg.require_loaded_neighbors);
    assert_eq!(cfg.patch_size, 16);
    assert_eq!(cfg.grid_dims().edge_samples(), 64);
    assert_eq!(cfg.mesh_params().spacing_x, 2.5);
}

#[test]
fn invalid_values_are_rejected() {
    for bad in [
        "patch_size = 0",
        "patches_per_edge = 0",
        "patches_per_edge = 33",
        "patch_size = 300",
        "vertex_spacing_y = 0.0",
        "vertex_spacing_x = -1.0",
        "height_change_epsilon = -0.5",
        "patch_size = \"big\"",
    ] {
        assert!(TerrainConfig::from_toml_str(bad).is_err(), "{bad}");
    }
}

#[test]
fn terrain_refuses_invalid_config() {
    let cfg = TerrainConfig {
        patch_size: 0,
        ..TerrainConfig::default()
    };
    assert!(Terrain::new(cfg).is_err());
}

#[test]
fn loads_from_file() {
    let dir = std::env::temp_dir().join(format!("tessera-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("terrain.toml");
    std::fs::write(&path, "patch_size = 8\ntexture_layers = 2\n").unwrap();
    let cfg = TerrainConfig::from_path(&path).unwrap();
    assert_eq!(cfg.patch_size, 8);
    assert_eq!(cfg.texture_layers, 2);
    assert!(TerrainConfig::from_path(&dir.join("missing.toml")).is_err());
    std::fs::remove_dir_all(&dir).unwrap();
}
