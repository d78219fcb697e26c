use typehierarchy::hierarchy::{
    AssignabilityCache, EdgeCache, HierarchyResolver, LoadOrderResolver, TypeHierarchy,
};
use typehierarchy::jvm::class_file::ClassPath;
use typehierarchy::jvm::class_graph::ClassGraph;
use typehierarchy::jvm::{Error, TypeRef};

use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::process;

fn main() {
    env_logger::init();

    let type_arg = |name: &'static str| {
        Arg::new(name)
            .required(true)
            .help(
                "Internal name (eg. `java/lang/String`) or field descriptor (eg. `[I`). Single \
                 letter classes must be written as descriptors (eg. `LI;`)",
            )
    };
    let matches = Command::new("JVM type hierarchy")
        .version("0.1.0")
        .author("Alec Theriault <alec.theriault@gmail.com>")
        .about("Answer type hierarchy questions from class files, without loading them")
        .subcommand_required(true)
        .arg(
            Arg::new("classpath")
                .short('c')
                .long("classpath")
                .value_name("PATH")
                .action(ArgAction::Append)
                .value_parser(clap::value_parser!(PathBuf))
                .global(true)
                .help("Directory or jar of `.class` files to search (can be repeated)"),
        )
        .arg(
            Arg::new("no-cache")
                .long("no-cache")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Read class metadata again for every query"),
        )
        .subcommand(
            Command::new("superclass")
                .about("Print the superclass of a type")
                .arg(type_arg("TYPE")),
        )
        .subcommand(
            Command::new("is-interface")
                .about("Print whether a type is an interface")
                .arg(type_arg("TYPE")),
        )
        .subcommand(
            Command::new("assignable")
                .about("Print whether a value of type FROM can be stored in a TO")
                .arg(type_arg("TO"))
                .arg(type_arg("FROM")),
        )
        .subcommand(
            Command::new("common-superclass")
                .about("Print the closest common superclass of two types")
                .arg(type_arg("TYPE1"))
                .arg(type_arg("TYPE2")),
        )
        .subcommand(
            Command::new("load-order")
                .about("Print supertypes of a type in an order that is safe to load them in")
                .arg(type_arg("TYPE")),
        )
        .get_matches();

    // Global options are propagated down into the subcommand
    let options = match matches.subcommand() {
        Some((_, args)) => args,
        None => &matches,
    };
    let class_path = ClassPath::new(
        options
            .get_many::<PathBuf>("classpath")
            .into_iter()
            .flatten()
            .cloned(),
    );
    let class_graph = ClassGraph::new();
    class_graph.insert_java_library_types();
    let resolver = HierarchyResolver::new((class_path, class_graph));

    let result = if options.get_flag("no-cache") {
        run(resolver, &matches)
    } else {
        run(AssignabilityCache::new(EdgeCache::new(resolver)), &matches)
    };
    if let Err(err) = result {
        log::error!("{}", err);
        eprintln!("error: {}", err);
        process::exit(1);
    }
}

fn run<H: TypeHierarchy>(hierarchy: H, matches: &ArgMatches) -> Result<(), Error> {
    match matches.subcommand() {
        Some(("superclass", args)) => {
            match hierarchy.superclass_of(&type_of(args, "TYPE")?)? {
                Some(superclass) => println!("{}", superclass),
                None => println!("none"),
            }
        }
        Some(("is-interface", args)) => {
            println!("{}", hierarchy.is_interface(&type_of(args, "TYPE")?)?);
        }
        Some(("assignable", args)) => {
            let to = type_of(args, "TO")?;
            let from = type_of(args, "FROM")?;
            println!("{}", hierarchy.is_assignable_from(&to, &from)?);
        }
        Some(("common-superclass", args)) => {
            let typ1 = type_of(args, "TYPE1")?;
            let typ2 = type_of(args, "TYPE2")?;
            println!("{}", hierarchy.common_superclass(&typ1, &typ2)?);
        }
        Some(("load-order", args)) => {
            let typ = type_of(args, "TYPE")?;
            for loaded in LoadOrderResolver::new(hierarchy).load_order(&typ)? {
                println!("{}", loaded);
            }
        }
        _ => unreachable!("subcommand is required"),
    }
    Ok(())
}

fn type_of(args: &ArgMatches, name: &str) -> Result<TypeRef, Error> {
    parse_type(
        args.get_one::<String>(name)
            .map(String::as_str)
            .unwrap_or_default(),
    )
}

/// Types can be written as descriptors (`I`, `Ljava/lang/String;`, `[J`) or internal names
///
/// A lone base type letter is always the primitive. A class in the default package whose name is
/// one of those letters has to be written as a descriptor (`LI;`).
fn parse_type(typ: &str) -> Result<TypeRef, Error> {
    let is_descriptor = typ.starts_with('[')
        || (typ.starts_with('L') && typ.ends_with(';'))
        || (typ.len() == 1 && "BCDFIJSZ".contains(typ));
    if is_descriptor {
        TypeRef::parse_descriptor(typ)
    } else {
        TypeRef::from_internal_name(typ)
    }
}

#[cfg(test)]
mod test {
    use super::parse_type;
    use typehierarchy::jvm::{BaseType, BinaryName, TypeRef};

    #[test]
    fn type_arguments() {
        assert_eq!(parse_type("I").unwrap(), TypeRef::Base(BaseType::Int));
        assert_eq!(
            parse_type("LI;").unwrap(),
            TypeRef::object(BinaryName::from_string(String::from("I")).unwrap())
        );
        assert_eq!(
            parse_type("Q").unwrap(),
            TypeRef::object(BinaryName::from_string(String::from("Q")).unwrap())
        );
        assert_eq!(parse_type("java/lang/String").unwrap(), TypeRef::object(BinaryName::STRING));
        assert_eq!(
            parse_type("Ljava/lang/String;").unwrap(),
            TypeRef::object(BinaryName::STRING)
        );
        assert_eq!(
            parse_type("[[J").unwrap(),
            TypeRef::array_of(TypeRef::Base(BaseType::Long), 2).unwrap()
        );
        assert!(parse_type("java.lang.String").is_err());
        assert!(parse_type("").is_err());
    }
}
