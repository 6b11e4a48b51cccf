/// Build-script helper: generates codecs for every marked type in a schema
/// into `OUT_DIR/autoserde`.
///
/// The optional second argument is a path to a TOML config file; without
/// it the defaults apply. Expands to statements using `?`, so call it from
/// a `main` returning `Result`.
#[macro_export]
macro_rules! build {
    (@run $schema:expr, $config:expr) => {{
        use std::{env::var, path::PathBuf};

        //
        // CARGO
        //

        println!("cargo:rerun-if-changed=build.rs");
        println!("cargo:rustc-check-cfg=cfg(autoserde)");
        println!("cargo:rustc-cfg=autoserde");

        let out_dir = PathBuf::from(var("OUT_DIR")?).join("autoserde");

        //
        // CODECS
        //

        let config = $config;
        $crate::generate(&$schema, &config, &out_dir)?
    }};
    ($schema:expr) => {
        $crate::build!(@run $schema, $crate::__reexports::autoserde_schema::config::CodecConfig::default())
    };
    ($schema:expr, $config:expr) => {{
        let config_path = $config;
        println!("cargo:rerun-if-changed={config_path}");

        $crate::build!(
            @run $schema,
            $crate::__reexports::autoserde_schema::config::CodecConfig::from_path(config_path)?
        )
    }};
}
