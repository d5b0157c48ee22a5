fn main() {
    if let Err(err) = mindgraph_renderer::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
