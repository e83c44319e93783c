fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    #[cfg(feature = "cuda")]
    {
        use cc::Build;
        use glob::glob;
        use std::env;

        let cuda_path = env::var("CUDA_HOME")
            .or_else(|_| env::var("CUDA_PATH"))
            .expect("CUDA_HOME or CUDA_PATH must be set");

        let cu_files: Vec<_> = glob("src/ops/cuda/*.cu")
            .expect("Failed to read glob pattern")
            .filter_map(Result::ok)
            .collect();

        let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
        println!("cargo:rustc-link-search=native={}", out_dir);

        // one static library per kernel file, linked as kernel_<stem>
        for file in &cu_files {
            let stem = file
                .file_stem()
                .and_then(|s| s.to_str())
                .expect("kernel file name is valid UTF-8");
            Build::new()
                .cuda(true)
                .flag("-arch=sm_70")
                .flag("-gencode=arch=compute_70,code=sm_70")
                .file(file)
                .compile(&format!("kernel_{}", stem));
        }

        let lib_dir = if cfg!(target_os = "windows") { "lib/x64" } else { "lib64" };
        println!("cargo:rustc-link-search=native={}/{}", cuda_path, lib_dir);
        println!("cargo:rustc-link-lib=cudart");
        for file in &cu_files {
            println!("cargo:rerun-if-changed={}", file.display());
        }
    }
}
