use std::error::Error;

const PROTOS: &[&str] = &[
    "../proto/auth_service.proto",
    "../proto/vacancy_service.proto",
];

fn main() -> Result<(), Box<dyn Error>> {
    // Use the bundled compiler unless the environment names one.
    if std::env::var_os("PROTOC").is_none() {
        std::env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path()?);
    }

    tonic_build::configure()
        .build_server(false)
        .compile_protos(PROTOS, &["../proto"])?;

    for proto in PROTOS {
        println!("cargo:rerun-if-changed={proto}");
    }
    Ok(())
}
