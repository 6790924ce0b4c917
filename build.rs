fn main() {
    println!("cargo:rerun-if-changed=assets/curator.ico");

    #[cfg(target_os = "windows")]
    {
        if std::path::Path::new("assets/curator.ico").exists() {
            let mut res = winres::WindowsResource::new();
            res.set_icon("assets/curator.ico");
            res.set("ProductName", "Depth-RGB Curator");
            res.compile().expect("Failed to compile Windows resources");
        }
    }
}
