use log::LevelFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut clog = colog::default_builder();
    clog.filter(None, LevelFilter::Info);
    clog.init();

    rondo::runtime::run()
}
