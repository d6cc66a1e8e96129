use resultchain_core::error::RuntimeError;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match resultchain_core::runtime::parse_cli_args(&args) {
        Ok(options) => options,
        Err(RuntimeError::Info(message)) => {
            print!("{message}");
            return;
        }
        Err(RuntimeError::Usage(message)) => {
            eprintln!("{message}");
            std::process::exit(2);
        }
        Err(error) => {
            eprintln!("[resultchain-core] {error}");
            std::process::exit(2);
        }
    };

    if let Err(error) = resultchain_core::runtime::run_with_options(options) {
        eprintln!("[resultchain-core] replay failed: {error}");
        std::process::exit(1);
    }
}
